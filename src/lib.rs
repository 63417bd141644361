/*!
 * writur - content storage service for a blog platform
 *
 * Accepts image uploads over HTTP, stores them through a pluggable storage
 * backend (local filesystem or S3), and hands back public URLs. With the
 * local backend the access URL's path is mapped onto the upload directory
 * and served statically, so the URLs the service hands out resolve without
 * a dedicated download endpoint.
 */

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod routes;
pub mod services;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;


use config::{Config, UploadMode};
use services::file_service::FileService;
use storage::{StorageError, UrlMapping};

/// Shared state handed to every request handler.
pub struct AppState {
    pub config: Config,
    pub file_service: Arc<FileService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_check,
        routes::images::upload_image,
    ),
    components(schemas(routes::images::UploadResponse)),
    tags(
        (name = "health", description = "Service health"),
        (name = "images", description = "Image upload")
    )
)]
struct ApiDoc;

/// Assemble the application router.
///
/// When the local backend is active this also installs the resource-serving
/// mapping: the path component of the configured access URL is bound to the
/// physical upload root and served statically. A local access URL that
/// cannot be mapped is an error here, never a silently skipped mapping.
pub fn create_router(state: Arc<AppState>) -> Result<Router, StorageError> {
    let mut router = Router::new()
        .nest("/api/health", routes::health::router())
        .nest("/api/images", routes::images::router());

    if state.config.upload_mode == UploadMode::Local {
        let local = state.config.local.as_ref().ok_or_else(|| {
            StorageError::Configuration(
                "Upload mode is \"local\" but local storage configuration is missing".to_string(),
            )
        })?;
        let mapping = UrlMapping::from_config(local)?;
        info!(
            "Serving uploads: {} -> {}",
            mapping.pattern(),
            mapping.physical_root().display()
        );
        router = router.nest_service(mapping.serve_path(), ServeDir::new(mapping.physical_root()));
    }

    Ok(router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state))
}
