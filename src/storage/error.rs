//! Storage error types

use thiserror::Error;

/// Errors raised while selecting and preparing a storage backend.
///
/// Configuration problems are fatal at startup: the process refuses to come
/// up half-wired rather than serve uploads it cannot store or map.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),
}
