//! Core OrderBook implementation for managing price levels and orders

use super::cache::PriceLevelCache;
use super::order::{Order, Side};
use super::price_level::PriceLevel;
use super::snapshot::{MARKET_DATA_DEPTH, MarketDataSnapshot};
use super::trade::{Trade, TradeSequencer};
use crate::symbol::Symbol;
use crate::utils::monotonic_nanos;
use crossbeam::queue::SegQueue;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tracing::trace;
use uuid::Uuid;

/// The OrderBook holds the resting orders of one instrument.
///
/// All mutation happens on a single matching thread. The level maps and the
/// order index are concurrent maps so that market data publishers can read
/// them at any time without coordinating with the writer.
pub struct OrderBook {
    /// The instrument traded in this book
    pub(super) symbol: Symbol,

    /// Bid side price levels (buy orders) keyed by price
    pub(super) bids: DashMap<i64, Arc<PriceLevel>>,

    /// Ask side price levels (sell orders) keyed by price
    pub(super) asks: DashMap<i64, Arc<PriceLevel>>,

    /// Every resting order by id
    pub(super) orders: DashMap<u64, Arc<Order>>,

    /// Best price per side, maintained by the writer
    pub(super) best_prices: PriceLevelCache,

    /// Executions waiting to be drained, in emission order
    pub(super) trades: SegQueue<Trade>,

    /// Trade sequence numbers and the namespace trade ids derive from
    pub(super) trade_sequencer: TradeSequencer,

    /// The last price at which a trade occurred
    pub(super) last_trade_price: AtomicI64,

    /// Flag indicating if there was a trade
    pub(super) has_traded: AtomicBool,
}

impl OrderBook {
    /// Create a new, empty order book for the given symbol
    pub fn new(symbol: Symbol) -> Self {
        // Trade ids are derived from a namespace unique to this book
        let namespace = Uuid::new_v4();

        Self {
            symbol,
            bids: DashMap::new(),
            asks: DashMap::new(),
            orders: DashMap::new(),
            best_prices: PriceLevelCache::new(),
            trades: SegQueue::new(),
            trade_sequencer: TradeSequencer::new(namespace),
            last_trade_price: AtomicI64::new(0),
            has_traded: AtomicBool::new(false),
        }
    }

    /// Get the symbol of this order book
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub(super) fn levels(&self, side: Side) -> &DashMap<i64, Arc<PriceLevel>> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn scan_best(&self, side: Side) -> Option<i64> {
        let keys = self.levels(side).iter().map(|item| *item.key());
        match side {
            Side::Buy => keys.max(),
            Side::Sell => keys.min(),
        }
    }

    /// Best price of a side as seen by the matching thread, refreshing the
    /// cache when it has been invalidated.
    pub(super) fn best_price(&self, side: Side) -> Option<i64> {
        if let Some(best) = self.best_prices.get(side) {
            return best;
        }
        let best = self.scan_best(side);
        self.best_prices.store(side, best);
        best
    }

    /// Get the best bid price, if any
    pub fn best_bid(&self) -> Option<i64> {
        self.best_prices
            .get(Side::Buy)
            .unwrap_or_else(|| self.scan_best(Side::Buy))
    }

    /// Get the best ask price, if any
    pub fn best_ask(&self) -> Option<i64> {
        self.best_prices
            .get(Side::Sell)
            .unwrap_or_else(|| self.scan_best(Side::Sell))
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<i64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Get the last trade price, if any
    pub fn last_trade_price(&self) -> Option<i64> {
        if self.has_traded.load(Ordering::Acquire) {
            Some(self.last_trade_price.load(Ordering::Acquire))
        } else {
            None
        }
    }

    /// Check if an order at `price` on `side` would trade on arrival
    pub fn will_cross_market(&self, price: i64, side: Side) -> bool {
        match side {
            Side::Buy => self.best_ask().is_some_and(|best_ask| price >= best_ask),
            Side::Sell => self.best_bid().is_some_and(|best_bid| price <= best_bid),
        }
    }

    /// Get a resting order by ID
    pub fn get_order(&self, order_id: u64) -> Option<Arc<Order>> {
        self.orders
            .get(&order_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Get the price level at `price` on `side`
    pub fn get_level(&self, price: i64, side: Side) -> Option<Arc<PriceLevel>> {
        self.levels(side)
            .get(&price)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Get all orders at a price level, in time priority
    pub fn get_orders_at_price(&self, price: i64, side: Side) -> Vec<Arc<Order>> {
        trace!(
            "Order book {}: Getting orders at price {} for side {}",
            self.symbol, price, side
        );
        self.get_level(price, side)
            .map(|level| level.iter_orders())
            .unwrap_or_default()
    }

    /// Get all resting orders in the book
    pub fn get_all_orders(&self) -> Vec<Arc<Order>> {
        trace!("Order book {}: Getting all orders", self.symbol);
        self.bids
            .iter()
            .chain(self.asks.iter())
            .flat_map(|item| item.value().iter_orders())
            .collect()
    }

    /// Prices with resting orders on one side, best first
    pub fn level_prices(&self, side: Side) -> Vec<i64> {
        let mut prices: Vec<i64> = self.levels(side).iter().map(|item| *item.key()).collect();
        match side {
            Side::Buy => prices.sort_unstable_by(|a, b| b.cmp(a)),
            Side::Sell => prices.sort_unstable(),
        }
        prices
    }

    /// Number of resting orders
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Number of price levels on one side
    pub fn level_count(&self, side: Side) -> usize {
        self.levels(side).len()
    }

    /// Total resting quantity on one side
    pub fn total_quantity(&self, side: Side) -> u64 {
        self.levels(side)
            .iter()
            .map(|item| item.value().total_quantity())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Removes and returns every trade emitted since the last drain, in
    /// emission order
    pub fn drain_trades(&self) -> Vec<Trade> {
        let mut drained = Vec::with_capacity(self.trades.len());
        while let Some(trade) = self.trades.pop() {
            drained.push(trade);
        }
        drained
    }

    /// Number of trades waiting to be drained
    pub fn pending_trades(&self) -> usize {
        self.trades.len()
    }

    /// Top-of-book snapshot with the standard market data depth
    pub fn create_market_data_snapshot(&self) -> MarketDataSnapshot {
        self.create_snapshot(MARKET_DATA_DEPTH)
    }

    /// Create a snapshot of up to `depth` levels per side.
    ///
    /// Never mutates the book; levels removed between listing the prices and
    /// reading them are skipped.
    pub fn create_snapshot(&self, depth: usize) -> MarketDataSnapshot {
        // Get all bid prices and sort them in descending order
        let mut bid_prices: Vec<i64> = self.bids.iter().map(|item| *item.key()).collect();
        bid_prices.sort_unstable_by(|a, b| b.cmp(a));
        bid_prices.truncate(depth);

        // Get all ask prices and sort them in ascending order
        let mut ask_prices: Vec<i64> = self.asks.iter().map(|item| *item.key()).collect();
        ask_prices.sort_unstable();
        ask_prices.truncate(depth);

        let mut snapshot = MarketDataSnapshot::new(self.symbol, monotonic_nanos());

        snapshot.bids = bid_prices
            .into_iter()
            .filter_map(|price| self.get_level(price, Side::Buy))
            .map(|level| level.snapshot())
            .collect();

        snapshot.asks = ask_prices
            .into_iter()
            .filter_map(|price| self.get_level(price, Side::Sell))
            .map(|level| level.snapshot())
            .collect();

        snapshot
    }
}
