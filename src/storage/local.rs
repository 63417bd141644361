//! Local filesystem storage backend implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::LocalStorageConfig;

use super::{join_access_url, StorageBackend, StorageError};

/// Chunk size for streaming copies. Uploads of any size move through a
/// buffer of this fixed capacity.
const COPY_BUF_SIZE: usize = 64 * 1024;

/// Local filesystem storage backend
pub struct LocalStorageBackend {
    upload_path: String,
    access_url: String,
}

impl LocalStorageBackend {
    /// Create a new local storage backend
    pub fn new(config: LocalStorageConfig) -> Self {
        Self {
            upload_path: config.upload_path,
            access_url: config.access_url,
        }
    }

    /// Resolve a caller-supplied relative path against the upload root.
    ///
    /// Leading separators are trimmed first: `Path::join` would otherwise
    /// discard the root entirely when handed an absolute-looking path.
    fn resolve(&self, relative: &str) -> PathBuf {
        Path::new(&self.upload_path).join(relative.trim_start_matches('/'))
    }

    /// Stream the reader into `tmp` in fixed-size chunks, returning the
    /// byte count. The destination handle is dropped on every exit path,
    /// and every destination failure drains the reader before reporting.
    async fn copy_to_temp(
        &self,
        tmp: &Path,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<u64> {
        let mut file = match fs::File::create(tmp).await {
            Ok(file) => file,
            Err(e) => {
                drain(reader).await;
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to create temporary file {}", tmp.display())));
            }
        };

        let mut buf = vec![0u8; COPY_BUF_SIZE];
        let mut written: u64 = 0;
        loop {
            let n = reader
                .read(&mut buf)
                .await
                .context("Upload stream failed mid-copy")?;
            if n == 0 {
                break;
            }
            if let Err(e) = file.write_all(&buf[..n]).await {
                drain(reader).await;
                return Err(
                    anyhow::Error::new(e).context(format!("Failed to write {}", tmp.display()))
                );
            }
            written += n as u64;
        }

        file.flush()
            .await
            .with_context(|| format!("Failed to flush {}", tmp.display()))?;
        Ok(written)
    }
}

/// Read the remaining stream to exhaustion, discarding it.
///
/// The source may sit on a reusable transport, so a failed upload still
/// consumes whatever the caller was going to send.
async fn drain(reader: &mut (dyn AsyncRead + Send + Unpin)) {
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
    }
}

/// Best-effort removal of a temporary file left behind by a failed upload.
async fn remove_temp(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to clean up temporary file {}: {}", tmp.display(), e);
        }
    }
}

#[async_trait]
impl StorageBackend for LocalStorageBackend {
    async fn exists(&self, file_path: &str) -> bool {
        // Any failure to stat (missing, bad parent, permissions) reads as
        // absent; this probe is deliberately infallible.
        fs::metadata(self.resolve(file_path)).await.is_ok()
    }

    async fn upload(
        &self,
        dir_path: &str,
        file_name: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<()> {
        let dir = self.resolve(dir_path);
        // Idempotent, and safe under concurrent uploads racing to create
        // the same directory.
        if let Err(e) = fs::create_dir_all(&dir).await {
            drain(reader).await;
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to create upload directory {}", dir.display())));
        }

        let dest = dir.join(file_name);
        // Content lands under a temporary name and is renamed onto the
        // final path only once fully written, so a failed upload never
        // leaves a truncated file at the destination.
        let tmp = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        let bytes = match self.copy_to_temp(&tmp, reader).await {
            Ok(bytes) => bytes,
            Err(e) => {
                remove_temp(&tmp).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&tmp, &dest).await {
            remove_temp(&tmp).await;
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to move upload into {}", dest.display())));
        }

        info!("Stored file locally: {} ({} bytes)", dest.display(), bytes);
        Ok(())
    }

    fn file_access_url(&self, file_path: &str) -> String {
        join_access_url(&self.access_url, file_path)
    }

    fn backend_type(&self) -> &'static str {
        "local"
    }

    async fn initialize(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.upload_path).await?;
        info!("Local storage initialized at {}", self.upload_path);
        Ok(())
    }
}
