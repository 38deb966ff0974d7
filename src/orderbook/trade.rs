//! Trade records emitted by the matching algorithm

use super::order::Side;
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// One execution between an incoming (taker) order and a resting (maker) order.
///
/// Trades always execute at the maker's price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Execution sequence number within the producing book, from 0
    pub sequence: u64,
    /// Trade id namespace of the producing book
    pub namespace: Uuid,
    /// The incoming order
    pub taker_order_id: u64,
    /// The resting order
    pub maker_order_id: u64,
    /// User on the buying side of the execution
    pub buy_user_id: u64,
    /// User on the selling side of the execution
    pub sell_user_id: u64,
    pub symbol: Symbol,
    /// Side of the taker order
    pub taker_side: Side,
    /// Execution price (maker price, fixed-point 10^5)
    pub price: i64,
    pub quantity: u32,
    /// Monotonic nanoseconds at execution
    pub timestamp: u64,
}

impl Trade {
    /// Unique name-based (v5) trade id, derived from the book namespace and
    /// the sequence number. Hashed on demand, never on the matching path.
    pub fn trade_id(&self) -> Uuid {
        Uuid::new_v5(&self.namespace, &self.sequence.to_le_bytes())
    }
}

/// Hands out per-book trade sequence numbers under a fixed namespace
#[derive(Debug)]
pub struct TradeSequencer {
    namespace: Uuid,
    next: AtomicU64,
}

impl TradeSequencer {
    pub fn new(namespace: Uuid) -> Self {
        Self {
            namespace,
            next: AtomicU64::new(0),
        }
    }

    pub fn namespace(&self) -> Uuid {
        self.namespace
    }

    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
