//! Storage backend abstraction for uploaded content
//!
//! This module provides a clean abstraction over different storage backends
//! (local filesystem, S3, etc.) with a unified interface. The active backend
//! is chosen from configuration at startup; callers only ever see the trait.

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::AsyncRead;

pub mod error;
pub mod factory;
pub mod local;
pub mod mapping;
#[cfg(feature = "s3")]
pub mod s3;

pub use error::StorageError;
pub use mapping::UrlMapping;

/// Core storage backend trait that all storage implementations must implement
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Check whether content is already stored under the given relative path.
    ///
    /// This probe never fails: a path the backend cannot reach reads as
    /// absent, so callers can branch on the answer without error plumbing.
    async fn exists(&self, file_path: &str) -> bool;

    /// Store the full contents of `reader` under `dir_path/file_name`.
    ///
    /// Missing intermediate directories (or prefixes) are created. The
    /// reader is always consumed to exhaustion when the destination
    /// fails, whether it could not be prepared at all or the write broke
    /// partway through.
    async fn upload(
        &self,
        dir_path: &str,
        file_name: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<()>;

    /// Public URL the content at `file_path` is served from.
    ///
    /// Pure computation over configuration; it does not consult the stored
    /// content and works for paths that do not exist yet.
    fn file_access_url(&self, file_path: &str) -> String;

    /// Get a human-readable identifier for this storage backend type
    fn backend_type(&self) -> &'static str;

    /// Initialize the storage backend (create directories, validate access, etc.)
    async fn initialize(&self) -> Result<(), StorageError>;
}

/// Storage configuration enum for different backend types
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Local filesystem storage
    Local { config: crate::config::LocalStorageConfig },
    /// S3-compatible storage
    #[cfg(feature = "s3")]
    S3 { config: crate::config::S3StorageConfig },
}

/// Join an access URL prefix and a relative file path with exactly one
/// separator, whatever combination of trailing/leading slashes the two
/// sides carry.
pub(crate) fn join_access_url(prefix: &str, file_path: &str) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        file_path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::join_access_url;

    #[test]
    fn joins_with_single_separator_regardless_of_input_slashes() {
        assert_eq!(join_access_url("http://h/u", "img/a.png"), "http://h/u/img/a.png");
        assert_eq!(join_access_url("http://h/u/", "img/a.png"), "http://h/u/img/a.png");
        assert_eq!(join_access_url("http://h/u", "/img/a.png"), "http://h/u/img/a.png");
        assert_eq!(join_access_url("http://h/u/", "/img/a.png"), "http://h/u/img/a.png");
    }
}
