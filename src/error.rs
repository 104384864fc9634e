//! Error types for huffpack

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    #[error("truncated input: needed {needed} bytes, only {available} available")]
    TruncatedInput { needed: usize, available: usize },

    #[error("code for symbol {symbol:#04x} needs {length} bits, limit is {limit}")]
    OversizedCode { symbol: u8, length: usize, limit: u8 },

    #[error("no code assigned to symbol {symbol:#04x}")]
    MissingCode { symbol: u8 },

    #[error("bit read out of range: position {position} of {bit_len} valid bits")]
    BitOutOfRange { position: u64, bit_len: u64 },

    #[error("input of {size} bytes exceeds the limit of {limit} bytes")]
    InputTooLarge { size: u64, limit: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CompressError {
    fn from(e: serde_json::Error) -> Self {
        CompressError::SerializationError(e.to_string())
    }
}
