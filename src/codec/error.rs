use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer too small: need {need} bytes, have {have}")]
    BufferTooSmall { need: usize, have: usize },

    #[error("unknown message type: {0}")]
    UnknownMessageType(u32),

    #[error("unknown symbol ordinal: {0}")]
    UnknownSymbol(u32),

    #[error("invalid side: {0}")]
    InvalidSide(u8),

    #[error("invalid order quantity: {0}")]
    InvalidQuantity(u32),

    #[error("too many levels: {count} exceeds {max}")]
    TooManyLevels { count: usize, max: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    #[error("buffer too small: need {need} bytes, have {have}")]
    BufferTooSmall { need: usize, have: usize },

    #[error("too many levels: {count} exceeds {max}")]
    TooManyLevels { count: usize, max: usize },
}

pub type DecodeResult<T> = Result<T, DecodeError>;
pub type EncodeResult<T> = Result<T, EncodeError>;
