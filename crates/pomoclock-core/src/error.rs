//! Error types for pomoclock-core.
//!
//! The machine itself has no failure modes; errors only come out of the
//! persistence layer and are kept deliberately small.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the core library.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence-layer errors
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the key/value store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store file
    #[error("failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}
