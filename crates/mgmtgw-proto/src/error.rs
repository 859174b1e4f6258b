//! Protocol error types.

use thiserror::Error;

/// Protocol-level errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// A textual path could not be parsed.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The offending input.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A `path:value` pair could not be parsed.
    #[error("invalid path-value pair {0:?}")]
    InvalidPathValue(String),

    /// A typed value cannot be represented as JSON.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Reading externally supplied content failed.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that was being read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, Error>;
