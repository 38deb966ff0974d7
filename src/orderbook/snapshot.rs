//! Order book snapshot for market data

use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Number of levels per side carried in published market data
pub const MARKET_DATA_DEPTH: usize = 5;

/// Aggregate state of one price level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    /// Fixed-point price scaled by 10^5
    pub price: i64,
    /// Sum of remaining quantity at this price
    pub total_quantity: u64,
    /// Number of resting orders at this price
    pub order_count: u32,
}

/// Top-of-book view of one instrument.
///
/// Built while the matching thread keeps running, so the two sides are not
/// guaranteed to come from the same instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDataSnapshot {
    pub symbol: Symbol,

    /// Monotonic nanoseconds when the snapshot was taken
    pub timestamp: u64,

    /// Buy levels, best (highest) first
    pub bids: Vec<LevelSummary>,

    /// Sell levels, best (lowest) first
    pub asks: Vec<LevelSummary>,
}

impl MarketDataSnapshot {
    /// An empty snapshot for `symbol`
    pub fn new(symbol: Symbol, timestamp: u64) -> Self {
        Self {
            symbol,
            timestamp,
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Get the best bid price and quantity
    pub fn best_bid(&self) -> Option<(i64, u64)> {
        let bid = self
            .bids
            .first()
            .map(|level| (level.price, level.total_quantity));
        trace!("best_bid: {:?}", bid);
        bid
    }

    /// Get the best ask price and quantity
    pub fn best_ask(&self) -> Option<(i64, u64)> {
        let ask = self
            .asks
            .first()
            .map(|level| (level.price, level.total_quantity));
        trace!("best_ask: {:?}", ask);
        ask
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid_price, _)), Some((ask_price, _))) => {
                Some((bid_price as f64 + ask_price as f64) / 2.0)
            }
            _ => None,
        }
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<i64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid_price, _)), Some((ask_price, _))) => Some(ask_price - bid_price),
            _ => None,
        }
    }

    /// Total quantity across the published bid levels
    pub fn total_bid_volume(&self) -> u64 {
        self.bids.iter().map(|level| level.total_quantity).sum()
    }

    /// Total quantity across the published ask levels
    pub fn total_ask_volume(&self) -> u64 {
        self.asks.iter().map(|level| level.total_quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
