/// Marker inserted before the extension of compressed copies.
pub const MARKER: &str = ".cmprs";

/// Local ceiling on monthly compressions. The remote service keeps the real count.
pub const DEFAULT_QUOTA_LIMIT: u64 = 500;

pub const DEFAULT_TINIFY_ENDPOINT: &str = "https://api.tinify.com";
pub const TINIFY_SHRINK_PATH: &str = "/shrink";
pub const TINIFY_AUTH_USER: &str = "api";
pub const COMPRESSION_COUNT_HEADER: &str = "compression-count";
pub const USER_AGENT: &str = concat!("compress-img/", env!("CARGO_PKG_VERSION"));

pub const API_KEY_VAR: &str = "API_KEY";
pub const ENDPOINT_VAR: &str = "COMPRESS_IMG_ENDPOINT";
pub const QUOTA_VAR: &str = "COMPRESS_IMG_QUOTA";
pub const DOTENV_FILE: &str = ".env";

// Status line symbols
pub const SUCCESS_SYMBOL: &str = "✓";
pub const ERROR_SYMBOL: &str = "×";
pub const INFO_SYMBOL: &str = "i";
pub const WARNING_SYMBOL: &str = "!";

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.blue} {msg} [{elapsed}]";
pub const SPINNER_TICK_MILLIS: u64 = 100;
