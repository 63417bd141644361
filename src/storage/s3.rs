//! S3-compatible storage backend implementation
//!
//! Same contract as the local backend with network calls in place of
//! filesystem calls. Stored objects are served from the bucket's own
//! public URL, so the local resource-serving mapping is never installed
//! for this backend.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{info, warn};

use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use aws_types::region::Region as AwsRegion;

use crate::config::S3StorageConfig;

use super::{join_access_url, StorageBackend, StorageError};

/// S3-compatible storage backend
pub struct S3StorageBackend {
    client: Client,
    config: S3StorageConfig,
}

impl S3StorageBackend {
    /// Create a new S3 storage backend, validating the configuration and
    /// building the client. No network calls happen here; reachability is
    /// checked in `initialize`.
    pub fn new(config: S3StorageConfig) -> Result<Self, StorageError> {
        if config.bucket_name.is_empty() {
            return Err(StorageError::Configuration(
                "S3 bucket name is required".to_string(),
            ));
        }
        if config.access_key_id.is_empty() {
            return Err(StorageError::Configuration(
                "S3 access key ID is required".to_string(),
            ));
        }
        if config.secret_access_key.is_empty() {
            return Err(StorageError::Configuration(
                "S3 secret access key is required".to_string(),
            ));
        }
        if config.access_url.is_empty() {
            return Err(StorageError::Configuration(
                "S3 access URL is required".to_string(),
            ));
        }

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None, // session token
            None, // expiry
            "writur-s3-storage",
        );

        let region = if config.region.is_empty() {
            "us-east-1".to_string()
        } else {
            config.region.clone()
        };

        let mut s3_config_builder = aws_sdk_s3::config::Builder::new()
            .region(AwsRegion::new(region))
            .credentials_provider(credentials)
            .behavior_version_latest();

        // Set custom endpoint if provided (for S3-compatible services)
        if let Some(endpoint_url) = &config.endpoint_url {
            if !endpoint_url.is_empty() {
                s3_config_builder = s3_config_builder.endpoint_url(endpoint_url);
                info!("Using custom S3 endpoint: {}", endpoint_url);
            }
        }

        let client = Client::from_conf(s3_config_builder.build());

        Ok(Self { client, config })
    }

    /// Object key for a caller-supplied relative path.
    fn object_key(&self, file_path: &str) -> String {
        file_path.trim_start_matches('/').to_string()
    }
}

#[async_trait]
impl StorageBackend for S3StorageBackend {
    async fn exists(&self, file_path: &str) -> bool {
        let key = self.object_key(file_path);
        match self
            .client
            .head_object()
            .bucket(&self.config.bucket_name)
            .key(&key)
            .send()
            .await
        {
            Ok(_) => true,
            Err(e) => {
                let error_msg = e.to_string();
                if !error_msg.contains("NotFound") && !error_msg.contains("404") {
                    // The probe never fails; an unreachable bucket reads as
                    // absent, but it is worth a trace.
                    warn!("S3 existence check for {} failed, treating as absent: {}", key, e);
                }
                false
            }
        }
    }

    async fn upload(
        &self,
        dir_path: &str,
        file_name: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<()> {
        let key = self.object_key(&format!(
            "{}/{}",
            dir_path.trim_end_matches('/'),
            file_name
        ));

        // PutObject wants the whole body up front, so the stream is drained
        // into memory first.
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .await
            .context("Upload stream failed mid-copy")?;
        let len = data.len();

        self.client
            .put_object()
            .bucket(&self.config.bucket_name)
            .key(&key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to store s3://{}/{}: {}",
                    self.config.bucket_name,
                    key,
                    e
                )
            })?;

        info!(
            "Stored file in S3: s3://{}/{} ({} bytes)",
            self.config.bucket_name, key, len
        );
        Ok(())
    }

    fn file_access_url(&self, file_path: &str) -> String {
        join_access_url(&self.config.access_url, file_path)
    }

    fn backend_type(&self) -> &'static str {
        "s3"
    }

    async fn initialize(&self) -> Result<(), StorageError> {
        self.client
            .head_bucket()
            .bucket(&self.config.bucket_name)
            .send()
            .await
            .map_err(|e| {
                StorageError::Configuration(format!(
                    "Cannot access S3 bucket {}: {}",
                    self.config.bucket_name, e
                ))
            })?;

        info!(
            "S3 storage backend initialized for bucket {}",
            self.config.bucket_name
        );
        Ok(())
    }
}
