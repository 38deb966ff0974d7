//! OrderBook implementation for managing price levels and order matching.

pub mod book;
mod cache;
mod modifications;
mod operations;
mod order;
mod price_level;
mod snapshot;
mod trade;

pub mod matching;

pub use book::OrderBook;
pub use matching::MatchOutcome;
pub use modifications::ModifyOutcome;
pub use order::{Order, Side};
pub use price_level::PriceLevel;
pub use snapshot::{LevelSummary, MARKET_DATA_DEPTH, MarketDataSnapshot};
pub use trade::{Trade, TradeSequencer};
