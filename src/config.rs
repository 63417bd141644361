use anyhow::{anyhow, Result};
use std::env;

/// Which storage strategy the process runs with. Decided once at startup
/// from `UPLOAD_MODE`; nothing downstream ever inspects backend types at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    Local,
    S3,
}

impl std::fmt::Display for UploadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadMode::Local => write!(f, "local"),
            UploadMode::S3 => write!(f, "s3"),
        }
    }
}

impl TryFrom<String> for UploadMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "local" => Ok(UploadMode::Local),
            "s3" => Ok(UploadMode::S3),
            _ => Err(format!("Invalid upload mode: {}", value)),
        }
    }
}

/// Settings for the local filesystem backend.
#[derive(Debug, Clone)]
pub struct LocalStorageConfig {
    /// Directory uploaded files are written under.
    pub upload_path: String,
    /// Absolute URL prefix stored files are served from. Its path component
    /// is also what the resource-serving mapping binds to `upload_path`.
    pub access_url: String,
}

/// Settings for the S3-compatible backend.
#[derive(Debug, Clone)]
pub struct S3StorageConfig {
    pub bucket_name: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
    pub endpoint_url: Option<String>,
    /// Public URL prefix objects are served from (bucket website or CDN).
    pub access_url: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub upload_mode: UploadMode,
    /// Present exactly when `upload_mode` is `Local`.
    pub local: Option<LocalStorageConfig>,
    /// Present exactly when `upload_mode` is `S3`.
    pub s3: Option<S3StorageConfig>,
    /// Lowercased file extensions accepted by the upload endpoint.
    pub allowed_file_types: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let server_address =
            env::var("SERVER_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let upload_mode: UploadMode = env::var("UPLOAD_MODE")
            .unwrap_or_else(|_| "local".to_string())
            .try_into()
            .map_err(|e: String| anyhow!(e))?;

        let allowed_file_types = env::var("ALLOWED_FILE_TYPES")
            .unwrap_or_else(|_| "jpg,jpeg,png,gif,webp,svg,ico,bmp".to_string())
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let local = match upload_mode {
            UploadMode::Local => Some(LocalStorageConfig {
                upload_path: require_env("LOCAL_UPLOAD_PATH", "local")?,
                access_url: require_env("LOCAL_ACCESS_URL", "local")?,
            }),
            _ => None,
        };

        let s3 = match upload_mode {
            UploadMode::S3 => Some(S3StorageConfig {
                bucket_name: require_env("S3_BUCKET_NAME", "s3")?,
                region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: require_env("S3_ACCESS_KEY_ID", "s3")?,
                secret_access_key: require_env("S3_SECRET_ACCESS_KEY", "s3")?,
                endpoint_url: env::var("S3_ENDPOINT_URL").ok().filter(|v| !v.is_empty()),
                access_url: require_env("S3_ACCESS_URL", "s3")?,
            }),
            _ => None,
        };

        Ok(Config {
            server_address,
            upload_mode,
            local,
            s3,
            allowed_file_types,
        })
    }
}

/// Fetch a variable the active upload mode cannot run without. Unset and
/// blank both count as missing.
fn require_env(name: &str, mode: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow!(
            "{} is required when UPLOAD_MODE is \"{}\"",
            name,
            mode
        )),
    }
}
