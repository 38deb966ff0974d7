//! Best bid / best ask cache maintained by the matching thread.

use super::order::Side;
use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicI64, AtomicU8, Ordering};

const UNKNOWN: u8 = 0;
const EMPTY: u8 = 1;
const PRESENT: u8 = 2;

#[derive(Debug)]
struct CachedPrice {
    state: AtomicU8,
    price: AtomicI64,
}

impl CachedPrice {
    fn new() -> Self {
        Self {
            state: AtomicU8::new(EMPTY),
            price: AtomicI64::new(0),
        }
    }

    fn load(&self) -> Option<Option<i64>> {
        match self.state.load(Ordering::Acquire) {
            EMPTY => Some(None),
            PRESENT => Some(Some(self.price.load(Ordering::Acquire))),
            _ => None,
        }
    }

    fn store(&self, best: Option<i64>) {
        match best {
            Some(price) => {
                self.price.store(price, Ordering::Release);
                self.state.store(PRESENT, Ordering::Release);
            }
            None => self.state.store(EMPTY, Ordering::Release),
        }
    }
}

/// Caches the best price of each side of a book.
///
/// Only the matching thread may write. Readers on other threads may observe a
/// stale price but never one the writer did not store.
#[derive(Debug)]
pub struct PriceLevelCache {
    best_bid: CachePadded<CachedPrice>,
    best_ask: CachePadded<CachedPrice>,
}

impl PriceLevelCache {
    /// A cache for an empty book
    pub fn new() -> Self {
        Self {
            best_bid: CachePadded::new(CachedPrice::new()),
            best_ask: CachePadded::new(CachedPrice::new()),
        }
    }

    fn side(&self, side: Side) -> &CachedPrice {
        match side {
            Side::Buy => &self.best_bid,
            Side::Sell => &self.best_ask,
        }
    }

    /// `None` when the side must be rescanned, `Some(None)` when the side is
    /// known to be empty.
    pub fn get(&self, side: Side) -> Option<Option<i64>> {
        self.side(side).load()
    }

    pub fn store(&self, side: Side, best: Option<i64>) {
        self.side(side).store(best);
    }

    pub fn invalidate(&self, side: Side) {
        self.side(side).state.store(UNKNOWN, Ordering::Release);
    }

    /// Records a newly created level, promoting it if it improves the side.
    pub fn level_added(&self, side: Side, price: i64) {
        let better = |current: i64| match side {
            Side::Buy => price > current,
            Side::Sell => price < current,
        };
        match self.get(side) {
            Some(None) => self.store(side, Some(price)),
            Some(Some(current)) if better(current) => self.store(side, Some(price)),
            _ => {}
        }
    }

    /// Records a removed level; removing the cached best forces a rescan.
    pub fn level_removed(&self, side: Side, price: i64) {
        if self.get(side) == Some(Some(price)) {
            self.invalidate(side);
        }
    }
}

impl Default for PriceLevelCache {
    fn default() -> Self {
        Self::new()
    }
}
