//! Factory for creating storage backends based on configuration

use std::sync::Arc;

use tracing::info;

use super::local::LocalStorageBackend;
use super::{StorageBackend, StorageConfig, StorageError};

#[cfg(feature = "s3")]
use super::s3::S3StorageBackend;

use crate::config::{Config, UploadMode};

/// Create a storage backend based on the provided configuration and run
/// its startup checks.
pub async fn create_storage_backend(
    config: StorageConfig,
) -> Result<Arc<dyn StorageBackend>, StorageError> {
    let backend: Arc<dyn StorageBackend> = match config {
        StorageConfig::Local { config } => Arc::new(LocalStorageBackend::new(config)),
        #[cfg(feature = "s3")]
        StorageConfig::S3 { config } => Arc::new(S3StorageBackend::new(config)?),
    };

    backend.initialize().await?;
    info!("Storage backend ready: {}", backend.backend_type());
    Ok(backend)
}

/// Map the validated process configuration onto a backend selection.
///
/// A mode whose configuration section is missing, or a mode this build
/// cannot provide, is a hard error rather than a silent fallback to local
/// storage.
pub fn storage_config_from_env(config: &Config) -> Result<StorageConfig, StorageError> {
    match config.upload_mode {
        UploadMode::Local => {
            let local = config.local.clone().ok_or_else(|| {
                StorageError::Configuration(
                    "Upload mode is \"local\" but local storage configuration is missing"
                        .to_string(),
                )
            })?;
            Ok(StorageConfig::Local { config: local })
        }
        UploadMode::S3 => {
            #[cfg(feature = "s3")]
            {
                let s3 = config.s3.clone().ok_or_else(|| {
                    StorageError::Configuration(
                        "Upload mode is \"s3\" but S3 storage configuration is missing"
                            .to_string(),
                    )
                })?;
                Ok(StorageConfig::S3 { config: s3 })
            }
            #[cfg(not(feature = "s3"))]
            {
                Err(StorageError::Configuration(
                    "Upload mode is \"s3\" but this build does not include the s3 feature"
                        .to_string(),
                ))
            }
        }
    }
}
