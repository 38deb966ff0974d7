//! # Low-Latency FX Matching Engine
//!
//! A single-node limit order matching engine for foreign exchange instruments.
//! Orders arrive as fixed-layout binary commands, are matched with price-time
//! priority in per-instrument order books, and top-of-book market data is
//! published continuously while matching runs.
//!
//! ## Key Features
//!
//! - **Single-Writer Matching**: One dedicated thread owns every book mutation.
//!   The level maps and order index are concurrent maps, so publishers read them
//!   without coordinating with the writer.
//!
//! - **Price-Time Priority**: Best price first, then arrival order. Trades
//!   execute at the resting (maker) order's price and partial fills leave the
//!   remainder resting.
//!
//! - **Cancel and Modify**: Cancels of unknown orders are harmless no-ops.
//!   Quantity-only modifies keep queue position; price changes re-enter the order
//!   at the back of its new level.
//!
//! - **Binary Protocol**: Little-endian fixed-width commands (NEW_ORDER 29 bytes,
//!   CANCEL_ORDER 16 bytes, MODIFY_ORDER 28 bytes) and market data snapshots with
//!   explicit level counts.
//!
//! - **Latency-First Waiting**: Polling and back pressure retries spin by default;
//!   a backoff strategy is available where CPU matters more than latency.
//!
//! - **Cache-Line Isolation**: Hot atomics (id generator, processed count, level
//!   aggregates) sit on their own cache lines and orders are 64-byte aligned.
//!
//! ## Architecture
//!
//! ```text
//! producers -> inbound channel -> matching thread -> codec -> registry -> order book
//!                                                                        |-> trades (drain_trades)
//! publisher threads <- order books  (snapshot -> codec -> outbound channel)
//! ```
//!
//! ## Consistency
//!
//! Market data snapshots are read while the matching thread keeps running.
//! They are eventually consistent: a snapshot may combine a bid side and an ask
//! side from slightly different moments.
//!
//! ## Example
//!
//! ```no_run
//! use fx_matching_engine::{EngineConfig, MatchingEngine, Side, Symbol};
//!
//! let engine = MatchingEngine::with_ipc(EngineConfig::default()).unwrap();
//! engine.start().unwrap();
//! engine.submit_order(Symbol::EurUsd, Side::Buy, 123_450, 100, 1).unwrap();
//! engine.submit_order(Symbol::EurUsd, Side::Sell, 123_450, 40, 2).unwrap();
//! engine.shutdown();
//!
//! for trade in engine.drain_trades() {
//!     println!("{} {}@{}", trade.symbol, trade.quantity, trade.price);
//! }
//! ```

pub mod codec;
pub mod config;
pub mod counter;
pub mod engine;
pub mod idle;
pub mod orderbook;
pub mod registry;
pub mod symbol;
pub mod transport;

mod utils;

pub use codec::{DecodeError, EncodeError, OrderCommand};
pub use config::{ConfigError, EngineConfig};
pub use counter::OrderCounter;
pub use engine::{EngineError, MatchingEngine, OrderAck};
pub use idle::IdleStrategy;
pub use orderbook::{
    LevelSummary, MarketDataSnapshot, MatchOutcome, ModifyOutcome, Order, OrderBook, Side, Trade,
};
pub use registry::OrderBookRegistry;
pub use symbol::Symbol;
pub use transport::{IpcChannel, MessageChannel, OfferError};
pub use utils::{monotonic_nanos, setup_logger};
