//! Message transport boundary.
//!
//! The engine talks to the outside world through two one-way channels: one
//! carrying order commands in and one carrying market data out. Both are
//! non-blocking: offers may be refused under back pressure and polls return
//! whatever is available.

mod ipc;

pub use ipc::IpcChannel;

use crate::idle::{IdleStrategy, Idler};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferError {
    #[error("channel is back pressured")]
    BackPressured,

    #[error("message of {size} bytes exceeds the maximum of {max}")]
    MessageTooLarge { size: usize, max: usize },

    #[error("channel is closed")]
    Closed,
}

impl OfferError {
    /// Whether retrying the same offer can succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, OfferError::BackPressured)
    }
}

/// One direction of message flow
pub trait MessageChannel: Send + Sync {
    /// Attempts to enqueue a copy of `message` without blocking
    fn offer(&self, message: &[u8]) -> Result<(), OfferError>;

    /// Hands up to `fragment_limit` available messages to `handler`, oldest
    /// first, returning how many were delivered. Never blocks.
    fn poll(&self, handler: &mut dyn FnMut(&[u8]), fragment_limit: usize) -> usize;
}

/// Offers `message`, waiting with `strategy` while the channel is back
/// pressured. Only non-transient failures are returned.
pub fn offer_with_retry(
    channel: &dyn MessageChannel,
    message: &[u8],
    strategy: IdleStrategy,
) -> Result<(), OfferError> {
    let idler = Idler::new(strategy);
    loop {
        match channel.offer(message) {
            Ok(()) => return Ok(()),
            Err(err) if err.is_transient() => idler.idle(),
            Err(err) => return Err(err),
        }
    }
}
