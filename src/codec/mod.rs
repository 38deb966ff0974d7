//! Binary wire protocol.
//!
//! Inbound order commands and outbound market data snapshots use fixed-width
//! little-endian integers packed without padding. Inbound commands start
//! with a 4-byte type tag; snapshots carry no tag since the outbound channel
//! only ever holds snapshots.

mod command;
mod error;
mod protocol;
mod snapshot;

pub use command::OrderCommand;
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
pub use protocol::*;
pub use snapshot::{decode_snapshot, encode_snapshot, encoded_snapshot_len};
