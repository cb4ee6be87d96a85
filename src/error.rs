use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by the remote compression service.
///
/// Every variant currently aborts the run the same way; the split mirrors
/// the service's own error classes so callers can tell them apart later.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressionError {
    #[error("Account error: {0}")]
    Account(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Another file already exists at {0} (use --force to overwrite)")]
    DestinationExists(PathBuf),

    #[error("API key validation failed: {0}")]
    Auth(String),

    #[error("This API key has used {count} of the {limit} compressions allowed per month")]
    QuotaExceeded { count: u64, limit: u64 },

    #[error(transparent)]
    Remote(#[from] CompressionError),

    #[error("The compressed file could not be saved to {0}")]
    WriteVerificationFailed(PathBuf),

    #[error("Path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
