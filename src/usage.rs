use crate::client::CompressionService;
use crate::error::{Error, Result};

/// Usage counter as reported by the remote service, next to the local ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageState {
    pub compressed_count: u64,
    pub quota_limit: u64,
}

impl UsageState {
    pub fn is_exhausted(&self) -> bool {
        self.compressed_count >= self.quota_limit
    }

    pub fn remaining(&self) -> u64 {
        self.quota_limit.saturating_sub(self.compressed_count)
    }

    /// Fails fast with `QuotaExceeded` once the local ceiling is reached.
    /// The remote service remains the authority on actual billing limits.
    pub fn ensure_available(&self) -> Result<()> {
        if self.is_exhausted() {
            return Err(Error::QuotaExceeded {
                count: self.compressed_count,
                limit: self.quota_limit,
            });
        }
        Ok(())
    }
}

/// Validates the credential and returns the current usage snapshot.
/// Any failure of the check is reported as an `Auth` error.
pub async fn fetch_usage<S>(service: &S, quota_limit: u64) -> Result<UsageState>
where
    S: CompressionService + ?Sized,
{
    let compressed_count = service
        .validate_key()
        .await
        .map_err(|e| Error::Auth(e.to_string()))?;

    Ok(UsageState {
        compressed_count,
        quota_limit,
    })
}
