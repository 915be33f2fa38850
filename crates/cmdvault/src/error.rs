//! Error types for cmdvault

use thiserror::Error;

use crate::codec::CodecError;

/// Main error type for cmdvault operations
#[derive(Error, Debug)]
pub enum CmdvaultError {
    /// Storage-level failures that are not raised by sled itself
    #[error("Storage error: {0}")]
    Storage(String),

    /// Errors raised by the embedded sled database
    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),

    /// Record encoding/decoding errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cmdvault operations
pub type Result<T> = std::result::Result<T, CmdvaultError>;
