use crate::error::CompressionError;
use async_trait::async_trait;
use clap::ValueEnum;
use serde::Serialize;

/// Metadata the remote service should copy into the compressed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preserve {
    Copyright,
    Creation,
    Location,
}

impl Preserve {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preserve::Copyright => "copyright",
            Preserve::Creation => "creation",
            Preserve::Location => "location",
        }
    }
}

/// The remote side of the tool: a hosted service that checks API keys and
/// turns image bytes into smaller image bytes.
///
/// Credentials belong to the implementing value, so callers only hand over
/// the payload.
#[async_trait]
pub trait CompressionService: Send + Sync {
    /// Checks the credential and returns how many compressions the key has
    /// used this month.
    async fn validate_key(&self) -> Result<u64, CompressionError>;

    /// Compresses `source` and returns the compressed file contents.
    async fn compress(
        &self,
        source: Vec<u8>,
        preserve: &[Preserve],
    ) -> Result<Vec<u8>, CompressionError>;
}
