use crate::client::CompressionService;
use crate::error::{Error, Result};
use crate::paths::{resolve, FileTask, Mode};
use crate::usage::{fetch_usage, UsageState};
use crate::utils::create_progress_spinner;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
    pub usage: UsageState,
}

/// Runs one compression from start to finish:
/// validate key -> check quota -> resolve destination -> compress -> write -> verify.
///
/// Each step runs once. The first failure is returned as is; a destination
/// that was partly written before a failure is left in place.
pub async fn compress_file<S>(
    service: &S,
    task: &FileTask,
    quota_limit: u64,
) -> Result<CompressionReport>
where
    S: CompressionService + ?Sized,
{
    verbose!("Validating API key");
    let usage = fetch_usage(service, quota_limit).await?;
    verbose!(
        "Key accepted, {} of {} compressions used",
        usage.compressed_count,
        usage.quota_limit
    );
    usage.ensure_available()?;

    verbose!("Resolving destination for {}", task.source.display());
    let destination = resolve(task)?;
    if destination.collision_detected && task.mode == Mode::Default {
        warn!("Overwriting existing file {}", destination.path.display());
    }

    let source = fs_err::tokio::read(&task.source).await?;
    let original_size = source.len() as u64;

    let spinner = create_progress_spinner(&format!("Compressing {}", task.source.display()));
    let compressed = service.compress(source, &task.preserve).await;
    spinner.finish_and_clear();
    let compressed = compressed?;
    let compressed_size = compressed.len() as u64;

    verbose!("Writing {} bytes to {}", compressed_size, destination.path.display());
    fs_err::tokio::write(&destination.path, &compressed).await?;

    verify_written(&destination.path).await?;

    Ok(CompressionReport {
        source: task.source.clone(),
        destination: destination.path,
        original_size,
        compressed_size,
        usage,
    })
}

/// Confirms the output is on disk after the write reported success.
async fn verify_written(path: &Path) -> Result<()> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        Ok(())
    } else {
        Err(Error::WriteVerificationFailed(path.to_path_buf()))
    }
}
