//! Order book operations like adding and resting orders

use super::book::OrderBook;
use super::matching::MatchOutcome;
use super::order::{Order, Side};
use super::price_level::PriceLevel;
use crate::utils::monotonic_nanos;
use std::sync::Arc;
use tracing::trace;

impl OrderBook {
    /// Add a new order to the book.
    ///
    /// The order first trades against the opposite side; whatever is left
    /// rests at the back of its price level.
    pub fn add_order(&self, order: Order) -> MatchOutcome {
        trace!(
            "Order book {}: Adding order {} {} {}@{}",
            self.symbol,
            order.id(),
            order.side(),
            order.original_quantity(),
            order.price()
        );

        let outcome = self.match_order(&order);

        if !outcome.is_complete && order.remaining_quantity() > 0 {
            self.place_order_in_book(Arc::new(order));
        }

        outcome
    }

    /// Add a limit order stamped with the current time
    pub fn add_limit_order(
        &self,
        id: u64,
        side: Side,
        price: i64,
        quantity: u32,
        user_id: u64,
    ) -> MatchOutcome {
        let order = Order::new(
            id,
            self.symbol,
            side,
            price,
            quantity,
            user_id,
            monotonic_nanos(),
        );
        self.add_order(order)
    }

    /// Places a resting order at the back of its price level, creating the
    /// level when needed, and indexes it.
    pub(super) fn place_order_in_book(&self, order: Arc<Order>) {
        let (side, price, order_id) = (order.side(), order.price(), order.id());
        let book_side = self.levels(side);

        let mut created = false;
        let price_level = book_side
            .entry(price)
            .or_insert_with(|| {
                created = true;
                Arc::new(PriceLevel::new(price))
            })
            .value()
            .clone();

        self.orders.insert(order_id, Arc::clone(&order));
        price_level.add_order(order);

        if created {
            self.best_prices.level_added(side, price);
        }
        trace!(
            "Order book {}: Order {} resting at {} {}",
            self.symbol, order_id, side, price
        );
    }
}
