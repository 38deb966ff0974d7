//! Order and side definitions

use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Side of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Bid side
    Buy,
    /// Offer side
    Sell,
}

impl Side {
    /// The side an order on this side matches against
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Wire encoding: 0 = Buy, 1 = Sell
    pub fn to_wire(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Decodes the wire byte, `None` for anything other than 0 or 1
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A limit order.
///
/// Identity and terms are fixed at creation; only the remaining quantity
/// changes, and only on the matching thread. Orders are cache-line aligned so
/// that neighbouring orders never share a line with a hot remaining quantity.
#[derive(Debug)]
#[repr(align(64))]
pub struct Order {
    id: u64,
    symbol: Symbol,
    side: Side,
    /// Fixed-point price scaled by 10^5
    price: i64,
    original_quantity: u32,
    user_id: u64,
    /// Monotonic nanoseconds at acceptance
    timestamp: u64,
    remaining_quantity: AtomicU32,
}

impl Order {
    /// Creates an order whose remaining quantity equals its original quantity
    pub fn new(
        id: u64,
        symbol: Symbol,
        side: Side,
        price: i64,
        quantity: u32,
        user_id: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            id,
            symbol,
            side,
            price,
            original_quantity: quantity,
            user_id,
            timestamp,
            remaining_quantity: AtomicU32::new(quantity),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn original_quantity(&self) -> u32 {
        self.original_quantity
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Quantity still open on this order
    #[inline]
    pub fn remaining_quantity(&self) -> u32 {
        self.remaining_quantity.load(Ordering::Acquire)
    }

    /// Quantity executed so far
    pub fn filled_quantity(&self) -> u32 {
        self.original_quantity
            .saturating_sub(self.remaining_quantity())
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity() == 0
    }

    /// Reduces the remaining quantity by `quantity` (saturating at zero) and
    /// returns the new remaining quantity.
    #[inline]
    pub(crate) fn reduce(&self, quantity: u32) -> u32 {
        let remaining = self.remaining_quantity().saturating_sub(quantity);
        self.remaining_quantity.store(remaining, Ordering::Release);
        remaining
    }

    /// Overwrites the remaining quantity and returns the previous value.
    pub(crate) fn set_remaining(&self, quantity: u32) -> u32 {
        self.remaining_quantity.swap(quantity, Ordering::AcqRel)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order[id={} {} {} {}@{} remaining={} user={}]",
            self.id,
            self.symbol,
            self.side,
            self.original_quantity,
            self.price,
            self.remaining_quantity(),
            self.user_id
        )
    }
}
