//! Command handlers behind the CLI. Each prints its own status line on
//! success and returns errors to `main` for reporting.

use crate::client::Preserve;
use crate::compress::compress_file;
use crate::config::Config;
use crate::constants::MARKER;
use crate::error::Result;
use crate::paths::{FileTask, Mode};
use crate::rename::{rename_marked, RenameOutcome};
use crate::tinify::TinifyClient;
use crate::usage::fetch_usage;
use crate::utils::{calculate_compression_ratio, format_file_size};
use std::path::{Path, PathBuf};

pub async fn run_compress(
    config: &Config,
    file: &Path,
    new_name: Option<PathBuf>,
    replace: bool,
    force: bool,
    preserve: Vec<Preserve>,
) -> Result<()> {
    let client = TinifyClient::from_config(config)?;
    let task = FileTask::new(file, Mode::from_flags(replace, new_name), force, preserve)?;

    let report = compress_file(&client, &task, config.quota_limit).await?;

    let ratio = calculate_compression_ratio(report.original_size, report.compressed_size);
    success!(
        "Successfully compressed to {} ({} -> {}, {:.1}% smaller)",
        report.destination.display(),
        format_file_size(report.original_size),
        format_file_size(report.compressed_size),
        ratio
    );
    verbose!(
        "{} compressions left this month",
        report.usage.remaining().saturating_sub(1)
    );
    Ok(())
}

pub async fn run_count(config: &Config) -> Result<()> {
    let client = TinifyClient::from_config(config)?;
    let usage = fetch_usage(&client, config.quota_limit).await?;

    info!(
        "{} (out of {}) files have been compressed",
        usage.compressed_count, usage.quota_limit
    );
    if usage.is_exhausted() {
        warn!("The monthly limit is reached; further compressions will be refused");
    }
    Ok(())
}

pub fn run_rename(file: &Path, force: bool) -> Result<()> {
    match rename_marked(file, force)? {
        RenameOutcome::Renamed { to, .. } => success!("Renamed to {}.", to.display()),
        RenameOutcome::Unchanged(path) => {
            info!("{} has no {} marker, nothing to rename", path.display(), MARKER)
        }
    }
    Ok(())
}
