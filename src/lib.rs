#[macro_use]
pub mod logger;

pub mod cli;
pub mod client;
pub mod commands;
pub mod compress;
pub mod config;
pub mod constants;
pub mod error;
pub mod paths;
pub mod rename;
pub mod tinify;
pub mod usage;
pub mod utils;

pub use client::{CompressionService, Preserve};
pub use compress::{compress_file, CompressionReport};
pub use config::Config;
pub use error::{CompressionError, Error, Result};
pub use paths::{marked_path, resolve, FileTask, Mode, ResolvedDestination};
pub use rename::{rename_marked, strip_marker, RenameOutcome};
pub use tinify::TinifyClient;
pub use usage::{fetch_usage, UsageState};
