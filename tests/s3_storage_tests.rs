//! Basic S3 storage backend tests
//!
//! Construction and URL derivation only; nothing here talks to a real
//! bucket.

#[cfg(feature = "s3")]
use writur::config::S3StorageConfig;
#[cfg(feature = "s3")]
use writur::storage::s3::S3StorageBackend;
#[cfg(feature = "s3")]
use writur::storage::StorageBackend;

#[cfg(feature = "s3")]
fn base_config() -> S3StorageConfig {
    S3StorageConfig {
        bucket_name: "test-bucket".to_string(),
        region: "us-east-1".to_string(),
        access_key_id: "test-key".to_string(),
        secret_access_key: "test-secret".to_string(),
        endpoint_url: Some("http://localhost:9000".to_string()),
        access_url: "https://cdn.example.com/uploads".to_string(),
    }
}

#[cfg(feature = "s3")]
#[test]
fn test_backend_requires_bucket_name() {
    let mut config = base_config();
    config.bucket_name = String::new();

    let result = S3StorageBackend::new(config);
    assert!(result.is_err());
    assert!(result
        .err()
        .unwrap()
        .to_string()
        .contains("bucket name is required"));
}

#[cfg(feature = "s3")]
#[test]
fn test_backend_requires_credentials() {
    let mut config = base_config();
    config.access_key_id = String::new();
    assert!(S3StorageBackend::new(config).is_err());

    let mut config = base_config();
    config.secret_access_key = String::new();
    assert!(S3StorageBackend::new(config).is_err());
}

#[cfg(feature = "s3")]
#[test]
fn test_backend_requires_access_url() {
    let mut config = base_config();
    config.access_url = String::new();

    let result = S3StorageBackend::new(config);
    assert!(result.is_err());
    assert!(result
        .err()
        .unwrap()
        .to_string()
        .contains("access URL is required"));
}

#[cfg(feature = "s3")]
#[test]
fn test_backend_builds_with_custom_endpoint() {
    // MinIO-style configuration must construct without touching the network
    let backend = S3StorageBackend::new(base_config()).unwrap();
    assert_eq!(backend.backend_type(), "s3");
}

#[cfg(feature = "s3")]
#[test]
fn test_access_url_derivation_is_pure() {
    let backend = S3StorageBackend::new(base_config()).unwrap();

    assert_eq!(
        backend.file_access_url("articles/cover.png"),
        "https://cdn.example.com/uploads/articles/cover.png"
    );
    // Leading separators on the path collapse into the single join separator
    assert_eq!(
        backend.file_access_url("/articles/cover.png"),
        "https://cdn.example.com/uploads/articles/cover.png"
    );
}
