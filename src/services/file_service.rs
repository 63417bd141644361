/*!
 * Upload flow on top of the storage backend
 *
 * Handles everything the HTTP layer should not care about: content-derived
 * naming, skipping writes for content that is already stored, and turning
 * the stored path into a public URL.
 */

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::storage::StorageBackend;

pub struct FileService {
    backend: Arc<dyn StorageBackend>,
}

impl FileService {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Store `data` under `dir_path` with a name derived from its SHA256
    /// hash, and return the public URL it is reachable at.
    ///
    /// Identical content maps to the identical name, so re-uploading known
    /// bytes skips the physical write and still yields the same URL.
    pub async fn upload_file(
        &self,
        dir_path: &str,
        original_file_name: &str,
        data: &[u8],
    ) -> Result<String> {
        let file_name = hashed_file_name(original_file_name, data);
        let file_path = format!("{}/{}", dir_path.trim_end_matches('/'), file_name);

        if self.backend.exists(&file_path).await {
            debug!("Skipping upload of {}: content already stored", file_path);
        } else {
            let mut reader = Cursor::new(data);
            self.backend.upload(dir_path, &file_name, &mut reader).await?;
            info!(
                "Uploaded {} ({} bytes) via {} backend",
                file_path,
                data.len(),
                self.backend.backend_type()
            );
        }

        Ok(self.backend.file_access_url(&file_path))
    }

    /// Whether content is already stored under the given relative path.
    pub async fn exists(&self, file_path: &str) -> bool {
        self.backend.exists(file_path).await
    }

    /// Public URL for a stored (or yet-to-be-stored) relative path.
    pub fn file_access_url(&self, file_path: &str) -> String {
        self.backend.file_access_url(file_path)
    }
}

/// `<sha256 hex>.<original extension>`; content without a usable extension
/// is named by the digest alone.
fn hashed_file_name(original_file_name: &str, data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = format!("{:x}", hasher.finalize());

    let extension = Path::new(original_file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if extension.is_empty() {
        digest
    } else {
        format!("{}.{}", digest, extension)
    }
}
