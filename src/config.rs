//! Runtime configuration
//!
//! Read once from the environment at startup:
//! - `UNC_ENTRIES_URL`: source-indexed endpoint, queried as `?source={key}`
//! - `UNC_SOURCE_DIR`: read `{dir}/{key}.json` instead of using HTTP
//! - `UNC_FETCH_TIMEOUT_SECS`: per-request timeout in seconds

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::fetch::{DirectoryFetcher, FetchError, HttpFetcher, SourceFetcher};

pub const DEFAULT_ENTRIES_URL: &str = "http://127.0.0.1:3000/api/entries";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} cannot be empty")]
    Empty { var: &'static str },
}

/// Where raw source batches come from
#[derive(Debug, Clone, PartialEq)]
pub enum SourceMode {
    Http { entries_url: String },
    Directory { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub source_mode: SourceMode,
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_mode: SourceMode::Http {
                entries_url: DEFAULT_ENTRIES_URL.to_string(),
            },
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("UNC_ENTRIES_URL") {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::Empty { var: "UNC_ENTRIES_URL" });
            }
            config.source_mode = SourceMode::Http {
                entries_url: url.to_string(),
            };
        }

        // A source directory wins over HTTP
        if let Some(dir) = lookup("UNC_SOURCE_DIR") {
            if dir.trim().is_empty() {
                return Err(ConfigError::Empty { var: "UNC_SOURCE_DIR" });
            }
            config.source_mode = SourceMode::Directory {
                path: PathBuf::from(dir.trim()),
            };
        }

        if let Some(value) = lookup("UNC_FETCH_TIMEOUT_SECS") {
            let secs = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    var: "UNC_FETCH_TIMEOUT_SECS",
                    value: value.clone(),
                })?;
            config.fetch_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Build the fetcher for the configured source mode
    pub fn build_fetcher(&self) -> Result<Arc<dyn SourceFetcher>, FetchError> {
        let fetcher: Arc<dyn SourceFetcher> = match &self.source_mode {
            SourceMode::Http { entries_url } => {
                Arc::new(HttpFetcher::new(entries_url.clone(), self.fetch_timeout)?)
            }
            SourceMode::Directory { path } => Arc::new(DirectoryFetcher::new(path.clone())),
        };
        Ok(fetcher)
    }
}
