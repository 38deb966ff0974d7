//! A FIFO queue of resting orders at a single price

use super::order::Order;
use super::snapshot::LevelSummary;
use crossbeam::utils::CachePadded;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// All resting orders at one price on one side of a book.
///
/// The queue is only touched by the matching thread. The aggregate quantity
/// and order count are kept in their own cache lines so market data readers
/// can load them without contending with the queue.
#[derive(Debug)]
pub struct PriceLevel {
    price: i64,
    total_quantity: CachePadded<AtomicU64>,
    order_count: CachePadded<AtomicUsize>,
    queue: Mutex<LevelQueue>,
}

#[derive(Debug, Default)]
struct LevelQueue {
    orders: VecDeque<Arc<Order>>,
    by_id: HashMap<u64, Arc<Order>>,
}

impl PriceLevel {
    pub fn new(price: i64) -> Self {
        Self {
            price,
            total_quantity: CachePadded::new(AtomicU64::new(0)),
            order_count: CachePadded::new(AtomicUsize::new(0)),
            queue: Mutex::new(LevelQueue::default()),
        }
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    /// Sum of the remaining quantity of every order at this level
    #[inline]
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity.load(Ordering::Acquire)
    }

    #[inline]
    pub fn order_count(&self) -> usize {
        self.order_count.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.order_count() == 0
    }

    /// Appends an order at the back of the queue.
    pub fn add_order(&self, order: Arc<Order>) {
        let mut queue = self.queue.lock();
        let quantity = u64::from(order.remaining_quantity());
        queue.by_id.insert(order.id(), Arc::clone(&order));
        queue.orders.push_back(order);
        self.total_quantity.fetch_add(quantity, Ordering::AcqRel);
        self.order_count.fetch_add(1, Ordering::AcqRel);
    }

    /// Removes an order from the queue, keeping the relative order of the
    /// others. Returns `None` if the order does not rest here.
    pub fn remove_order(&self, order_id: u64) -> Option<Arc<Order>> {
        let mut queue = self.queue.lock();
        let order = queue.by_id.remove(&order_id)?;

        // Fills remove from the front, so the scan is usually one step
        if let Some(position) = queue.orders.iter().position(|o| o.id() == order_id) {
            queue.orders.remove(position);
        }

        self.total_quantity
            .fetch_sub(u64::from(order.remaining_quantity()), Ordering::AcqRel);
        self.order_count.fetch_sub(1, Ordering::AcqRel);
        Some(order)
    }

    /// The order with the best time priority at this price
    pub fn peek_first(&self) -> Option<Arc<Order>> {
        self.queue.lock().orders.front().cloned()
    }

    /// Executes `quantity` against a resting order, keeping the aggregate in
    /// step. Returns the order's new remaining quantity.
    pub fn fill(&self, order: &Order, quantity: u32) -> u32 {
        let before = order.remaining_quantity();
        let after = order.reduce(quantity);
        self.total_quantity
            .fetch_sub(u64::from(before - after), Ordering::AcqRel);
        after
    }

    /// Sets a resting order's remaining quantity without moving it in the
    /// queue. Returns the previous remaining quantity, or `None` if the order
    /// does not rest here.
    pub fn update_quantity(&self, order_id: u64, new_quantity: u32) -> Option<u32> {
        let queue = self.queue.lock();
        let order = queue.by_id.get(&order_id)?;
        let previous = order.set_remaining(new_quantity);

        if new_quantity >= previous {
            self.total_quantity
                .fetch_add(u64::from(new_quantity - previous), Ordering::AcqRel);
        } else {
            self.total_quantity
                .fetch_sub(u64::from(previous - new_quantity), Ordering::AcqRel);
        }
        Some(previous)
    }

    /// Whether the order rests at this level
    pub fn contains(&self, order_id: u64) -> bool {
        self.queue.lock().by_id.contains_key(&order_id)
    }

    /// Orders in time priority
    pub fn iter_orders(&self) -> Vec<Arc<Order>> {
        self.queue.lock().orders.iter().cloned().collect()
    }

    /// Aggregate view used in market data
    pub fn snapshot(&self) -> LevelSummary {
        LevelSummary {
            price: self.price,
            total_quantity: self.total_quantity(),
            order_count: u32::try_from(self.order_count()).unwrap_or(u32::MAX),
        }
    }
}
