//! FX instrument identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tradable currency pair.
///
/// The discriminant is the wire ordinal and must stay stable: new pairs are
/// appended, never inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u32)]
pub enum Symbol {
    /// Euro / US dollar
    EurUsd = 0,
    /// Pound sterling / US dollar
    GbpUsd = 1,
    /// US dollar / Japanese yen
    UsdJpy = 2,
}

impl Symbol {
    /// Every supported symbol, in ordinal order.
    pub const ALL: [Symbol; 3] = [Symbol::EurUsd, Symbol::GbpUsd, Symbol::UsdJpy];

    /// The value written on the wire for this symbol.
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    /// Looks a symbol up by its wire ordinal.
    pub fn from_ordinal(ordinal: u32) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// The conventional `BASE/QUOTE` name of the pair.
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::EurUsd => "EUR/USD",
            Symbol::GbpUsd => "GBP/USD",
            Symbol::UsdJpy => "USD/JPY",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match normalized.as_str() {
            "EURUSD" => Ok(Symbol::EurUsd),
            "GBPUSD" => Ok(Symbol::GbpUsd),
            "USDJPY" => Ok(Symbol::UsdJpy),
            _ => Err(format!("unknown symbol: {s}")),
        }
    }
}
