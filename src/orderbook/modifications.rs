//! Cancel and modify handling

use super::book::OrderBook;
use super::matching::MatchOutcome;
use super::order::Order;
use crate::utils::monotonic_nanos;
use std::sync::Arc;
use tracing::trace;

/// What a modify request did to the book
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifyOutcome {
    /// Quantity changed in place; the order kept its queue position
    Amended {
        previous_quantity: u32,
        new_quantity: u32,
    },
    /// The order was removed (new quantity of zero)
    Cancelled,
    /// The price changed: the order was re-entered as a new order and lost
    /// its time priority
    Replaced(MatchOutcome),
    /// An in-place increase above the order's original quantity
    Rejected,
}

impl OrderBook {
    /// Cancel an order by ID.
    ///
    /// Returns the removed order, or `None` if the id is not resting here.
    /// Unknown ids are expected (a cancel can race a fill) and are not errors.
    pub fn cancel_order(&self, order_id: u64) -> Option<Arc<Order>> {
        let (_, order) = self.orders.remove(&order_id)?;
        let (side, price) = (order.side(), order.price());
        let price_levels = self.levels(side);

        let level = price_levels
            .get(&price)
            .map(|entry| Arc::clone(entry.value()));

        if let Some(level) = level {
            level.remove_order(order_id);
            if level.is_empty() {
                price_levels.remove(&price);
                self.best_prices.level_removed(side, price);
            }
        }

        trace!("Order book {}: Cancelled order {}", self.symbol, order_id);
        Some(order)
    }

    /// Modify a resting order's price and/or quantity.
    ///
    /// A new price cancels the order and re-enters it under the same id with a
    /// fresh timestamp, so it may trade and goes to the back of its new level.
    /// An unchanged price updates the remaining quantity in place and keeps
    /// the queue position; a quantity of zero cancels. Returns `None` for an
    /// unknown id.
    pub fn modify_order(
        &self,
        order_id: u64,
        new_price: i64,
        new_quantity: u32,
    ) -> Option<ModifyOutcome> {
        let existing = self.get_order(order_id)?;
        trace!(
            "Order book {}: Modifying order {} to {}@{}",
            self.symbol, order_id, new_quantity, new_price
        );

        if new_quantity == 0 {
            self.cancel_order(order_id);
            return Some(ModifyOutcome::Cancelled);
        }

        if existing.price() != new_price {
            self.cancel_order(order_id);
            let replacement = Order::new(
                existing.id(),
                existing.symbol(),
                existing.side(),
                new_price,
                new_quantity,
                existing.user_id(),
                monotonic_nanos(),
            );
            return Some(ModifyOutcome::Replaced(self.add_order(replacement)));
        }

        if new_quantity > existing.original_quantity() {
            trace!(
                "Order book {}: Rejected in-place increase of order {} above {}",
                self.symbol,
                order_id,
                existing.original_quantity()
            );
            return Some(ModifyOutcome::Rejected);
        }

        let previous_quantity = self
            .get_level(existing.price(), existing.side())
            .and_then(|level| level.update_quantity(order_id, new_quantity))?;

        Some(ModifyOutcome::Amended {
            previous_quantity,
            new_quantity,
        })
    }
}
