use crate::codec::{DecodeError, EncodeError};
use crate::config::ConfigError;
use crate::transport::OfferError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine is already running")]
    AlreadyRunning,

    #[error("engine is running; books are owned by the matching thread")]
    Running,

    #[error("failed to spawn engine thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("failed to offer message: {0}")]
    Offer(#[from] OfferError),

    #[error("failed to decode message: {0}")]
    Decode(#[from] DecodeError),

    #[error("failed to encode message: {0}")]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
