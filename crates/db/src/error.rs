//! Error type for store operations.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not hold a valid collection.
    #[error("malformed collection file {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    #[error("failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result alias using [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
