//! Error types for the stats builder

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors that can occur while building stats
#[derive(Error, Debug)]
pub enum BuildError {
    /// File system errors, tagged with the path involved
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The raw feed cache does not exist
    #[error("No raw data found in {0:?}; fetch some EMP feeds first")]
    MissingRawDir(PathBuf),

    /// A cached feed that parsed as JSON but has an unexpected shape
    #[error("Malformed feed {path:?}: {reason}")]
    MalformedFeed { path: PathBuf, reason: String },
}

impl BuildError {
    /// Create a new I/O error for `path`
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io { path: path.as_ref().to_path_buf(), source }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new malformed feed error
    pub fn malformed_feed(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::MalformedFeed { path: path.as_ref().to_path_buf(), reason: reason.into() }
    }
}

impl From<config::ConfigError> for BuildError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
