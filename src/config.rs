use crate::constants::{
    API_KEY_VAR, DEFAULT_QUOTA_LIMIT, DEFAULT_TINIFY_ENDPOINT, DOTENV_FILE, ENDPOINT_VAR, QUOTA_VAR,
};
use crate::error::{Error, Result};
use std::env;

/// Runtime settings, read once at startup and passed to whoever needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub quota_limit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_TINIFY_ENDPOINT.to_string(),
            quota_limit: DEFAULT_QUOTA_LIMIT,
        }
    }
}

impl Config {
    /// Loads `.env` (current directory first, then next to the executable)
    /// and builds the configuration from the process environment.
    ///
    /// Variables already present in the environment are never overridden by
    /// the `.env` file.
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let endpoint = lookup(ENDPOINT_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_TINIFY_ENDPOINT.to_string());

        let quota_limit = match lookup(QUOTA_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("{} must be a whole number, got {:?}", QUOTA_VAR, raw))
            })?,
            None => DEFAULT_QUOTA_LIMIT,
        };

        Ok(Self {
            api_key,
            endpoint,
            quota_limit,
        })
    }

    /// Returns the API key, or an `Auth` error when none is configured.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::Auth(format!(
                "{} is not set (export it or add it to a {} file)",
                API_KEY_VAR, DOTENV_FILE
            ))
        })
    }
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(_) => return,
        Err(e) => report_dotenv_error(&e),
    }

    if let Some(exe_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
    {
        if let Err(e) = dotenvy::from_path(exe_dir.join(DOTENV_FILE)) {
            report_dotenv_error(&e);
        }
    }
}

/// A missing `.env` is normal; anything else is worth telling the user about.
fn report_dotenv_error(error: &dotenvy::Error) {
    if !error.not_found() {
        warn!("Could not load {}: {}", DOTENV_FILE, error);
    }
}
