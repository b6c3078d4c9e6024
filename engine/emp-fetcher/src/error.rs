//! Error types for the feed fetcher

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum FetchError {
    /// File system errors, tagged with the path involved
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport-level HTTP errors (DNS, connect, timeout, body read)
    #[error("Failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status
    #[error("HTTP error {status} for {url}")]
    Status { url: String, status: u16 },

    /// Successful response without a body
    #[error("No data returned for {0}")]
    EmptyBody(String),

    /// The source list does not exist
    #[error("Sources file not found: {0:?}")]
    MissingSources(PathBuf),

    /// A source line without a recognizable game id
    #[error("Could not extract match id from URL: {0}")]
    MalformedSource(String),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Create a new I/O error for `path`
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io { path: path.as_ref().to_path_buf(), source }
    }

    /// Create a new transport error for `url`
    pub fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http { url: url.into(), source }
    }
}
