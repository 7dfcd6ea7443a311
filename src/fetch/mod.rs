//! Raw source retrieval
//!
//! Fetchers return the raw JSON batch for a source key; they know nothing
//! about schemas. Validation happens after retrieval.

pub mod directory;
pub mod http;

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::sources::SourceKind;

pub use directory::DirectoryFetcher;
pub use http::HttpFetcher;

/// Retrieval failure for a single source
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch source {kind}: {source}")]
    Request {
        kind: SourceKind,
        source: reqwest::Error,
    },

    #[error("Failed to fetch source {kind}: HTTP {status}")]
    Status { kind: SourceKind, status: u16 },

    #[error("Failed to read source {kind} from {}: {source}", .path.display())]
    Io {
        kind: SourceKind,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Source {kind} returned invalid JSON: {source}")]
    Decode {
        kind: SourceKind,
        source: serde_json::Error,
    },

    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}

/// Retrieves the raw JSON batch for one source
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, kind: SourceKind) -> Result<Value, FetchError>;

    /// Where this fetcher reads from, for status reporting
    fn describe(&self) -> String;
}
