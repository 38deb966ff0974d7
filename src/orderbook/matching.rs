//! Contains the core matching engine logic for the order book.

use super::book::OrderBook;
use super::order::{Order, Side};
use super::trade::Trade;
use crate::utils::monotonic_nanos;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::trace;

/// Result of submitting an order to a book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// The incoming order
    pub order_id: u64,
    /// Quantity executed on arrival
    pub executed_quantity: u32,
    /// Quantity left after matching; rests in the book when non-zero
    pub remaining_quantity: u32,
    /// Executions in the order they happened
    pub trades: Vec<Trade>,
    /// Whether the incoming order was completely filled
    pub is_complete: bool,
}

impl MatchOutcome {
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }
}

/// Whether an incoming order at `price` trades against the opposite best price
#[inline]
fn crosses(side: Side, price: i64, best_opposite: i64) -> bool {
    match side {
        Side::Buy => price >= best_opposite,
        Side::Sell => price <= best_opposite,
    }
}

impl OrderBook {
    /// Matches an incoming order against the opposite side with price-time
    /// priority, reducing its remaining quantity in place.
    ///
    /// Levels are consumed best price first and, within a level, oldest order
    /// first. Every step emits one trade at the resting order's price. Filled
    /// resting orders and emptied levels leave the book immediately.
    pub(super) fn match_order(&self, incoming: &Order) -> MatchOutcome {
        let side = incoming.side();
        let opposite = side.opposite();
        let opposing_levels = self.levels(opposite);
        let mut trades = Vec::new();
        let mut executed_quantity = 0u32;

        while incoming.remaining_quantity() > 0 {
            let Some(best_price) = self.best_price(opposite) else {
                break;
            };
            if !crosses(side, incoming.price(), best_price) {
                break;
            }

            let Some(level) = opposing_levels
                .get(&best_price)
                .map(|entry| Arc::clone(entry.value()))
            else {
                // The cache pointed at a level that is gone
                self.best_prices.invalidate(opposite);
                if self.best_price(opposite) == Some(best_price) {
                    break;
                }
                continue;
            };

            while incoming.remaining_quantity() > 0 {
                let Some(resting) = level.peek_first() else {
                    break;
                };

                let quantity = incoming
                    .remaining_quantity()
                    .min(resting.remaining_quantity());

                if quantity > 0 {
                    incoming.reduce(quantity);
                    level.fill(&resting, quantity);
                    executed_quantity += quantity;

                    let trade = self.new_trade(incoming, &resting, best_price, quantity);
                    trace!(
                        "Order book {}: Trade #{} taker {} maker {} {}@{}",
                        self.symbol,
                        trade.sequence,
                        trade.taker_order_id,
                        trade.maker_order_id,
                        quantity,
                        best_price
                    );
                    self.trades.push(trade);
                    trades.push(trade);
                }

                if resting.is_filled() {
                    level.remove_order(resting.id());
                    self.orders.remove(&resting.id());
                }
            }

            if level.is_empty() {
                opposing_levels.remove(&best_price);
                self.best_prices.level_removed(opposite, best_price);
            }
        }

        if executed_quantity > 0 {
            if let Some(last) = trades.last() {
                self.last_trade_price.store(last.price, Ordering::Release);
                self.has_traded.store(true, Ordering::Release);
            }
        }

        let remaining_quantity = incoming.remaining_quantity();
        MatchOutcome {
            order_id: incoming.id(),
            executed_quantity,
            remaining_quantity,
            trades,
            is_complete: remaining_quantity == 0,
        }
    }

    fn new_trade(&self, taker: &Order, maker: &Order, price: i64, quantity: u32) -> Trade {
        let (buy_user_id, sell_user_id) = match taker.side() {
            Side::Buy => (taker.user_id(), maker.user_id()),
            Side::Sell => (maker.user_id(), taker.user_id()),
        };

        Trade {
            sequence: self.trade_sequencer.next(),
            namespace: self.trade_sequencer.namespace(),
            taker_order_id: taker.id(),
            maker_order_id: maker.id(),
            buy_user_id,
            sell_user_id,
            symbol: self.symbol,
            taker_side: taker.side(),
            price,
            quantity,
            timestamp: monotonic_nanos(),
        }
    }

    /// Quantity an order at `price` on `side` could execute right now,
    /// without touching the book
    pub fn peek_match(&self, side: Side, quantity: u32, price: i64) -> u32 {
        let opposing_levels = self.levels(side.opposite());

        let mut prices: Vec<i64> = opposing_levels
            .iter()
            .map(|item| *item.key())
            .filter(|level_price| crosses(side, price, *level_price))
            .collect();
        match side {
            Side::Buy => prices.sort_unstable(),
            Side::Sell => prices.sort_unstable_by(|a, b| b.cmp(a)),
        }

        let mut matched = 0u64;
        for level_price in prices {
            if matched >= u64::from(quantity) {
                break;
            }
            if let Some(level) = opposing_levels.get(&level_price) {
                matched += level.total_quantity();
            }
        }
        u32::try_from(matched.min(u64::from(quantity))).unwrap_or(quantity)
    }
}
