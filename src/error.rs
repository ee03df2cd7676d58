//! Typed errors for the storage engine.
//!
//! Application boundaries (`main`, the daemon, config loading) use `anyhow`
//! and wrap these with context; the engine itself reports structured errors
//! so callers can tell an I/O failure from a serialization failure.

use std::path::PathBuf;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Storage engine errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context.
    #[error("IO error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be encoded.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Snapshot could not be moved into place.
    #[error("failed to replace snapshot at {path:?}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a snapshot replacement error.
    pub fn persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persist {
            path: path.into(),
            source,
        }
    }
}
