/*!
 * Test Helpers and Utilities
 *
 * This module provides utilities for creating test configurations and
 * services with sensible defaults. Tests can modify the returned objects
 * as needed. Every helper works against a caller-supplied upload
 * directory so tests stay isolated from each other.
 */

use std::sync::Arc;

use crate::{
    config::{Config, LocalStorageConfig, UploadMode},
    services::file_service::FileService,
    storage::{factory::create_storage_backend, StorageConfig},
    AppState,
};

/// Access URL used by all local-backend test fixtures.
pub const TEST_ACCESS_URL: &str = "http://localhost:8000/upload/";

/// Creates a test configuration with sensible defaults, rooted at the
/// given upload directory.
pub fn create_test_config(upload_path: &str) -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        upload_mode: UploadMode::Local,
        local: Some(LocalStorageConfig {
            upload_path: upload_path.to_string(),
            access_url: TEST_ACCESS_URL.to_string(),
        }),
        s3: None,
        allowed_file_types: vec![
            "png".to_string(),
            "jpg".to_string(),
            "jpeg".to_string(),
            "gif".to_string(),
        ],
    }
}

/// Creates a test FileService backed by local storage in `upload_path`.
pub async fn create_test_file_service(upload_path: &str) -> Arc<FileService> {
    let storage_config = StorageConfig::Local {
        config: LocalStorageConfig {
            upload_path: upload_path.to_string(),
            access_url: TEST_ACCESS_URL.to_string(),
        },
    };
    let storage_backend = create_storage_backend(storage_config)
        .await
        .expect("Failed to create test storage backend");

    Arc::new(FileService::new(storage_backend))
}

/// Creates a test AppState with default configuration and services
pub async fn create_test_app_state(upload_path: &str) -> Arc<AppState> {
    let config = create_test_config(upload_path);
    create_test_app_state_with_config(config).await
}

/// Creates a test AppState with a custom configuration
/// This allows tests to customize config while still getting properly initialized services
pub async fn create_test_app_state_with_config(config: Config) -> Arc<AppState> {
    let local = config
        .local
        .clone()
        .expect("test config must carry local storage settings");
    let storage_backend = create_storage_backend(StorageConfig::Local { config: local })
        .await
        .expect("Failed to create test storage backend");

    Arc::new(AppState {
        config,
        file_service: Arc::new(FileService::new(storage_backend)),
    })
}
