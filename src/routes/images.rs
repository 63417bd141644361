use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::AppState;

/// Directory under the storage root that article images land in.
const ARTICLE_IMAGE_DIR: &str = "articles";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(upload_image))
}

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    /// Public URL the stored image is served from
    pub url: String,
}

/// Accepts a multipart form with the image in a `file` field.
#[utoipa::path(
    post,
    path = "/api/images",
    tag = "images",
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Missing file field, missing filename, or disallowed file type"),
        (status = 500, description = "Storage backend failure")
    )
)]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let (file_name, data) = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    return bad_request("Upload is missing a filename");
                };
                match field.bytes().await {
                    Ok(bytes) => break (file_name, bytes),
                    Err(e) => {
                        tracing::warn!("Failed to read multipart upload: {}", e);
                        return bad_request("Failed to read upload body");
                    }
                }
            }
            // Unknown fields are tolerated and skipped
            Ok(Some(_)) => continue,
            Ok(None) => return bad_request("Multipart field \"file\" is required"),
            Err(e) => {
                tracing::warn!("Malformed multipart request: {}", e);
                return bad_request("Malformed multipart request");
            }
        }
    };

    let extension = Path::new(&file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();
    if !state.config.allowed_file_types.contains(&extension) {
        return bad_request(&format!("File type {:?} is not allowed", extension));
    }

    match state
        .file_service
        .upload_file(ARTICLE_IMAGE_DIR, &file_name, &data)
        .await
    {
        Ok(url) => (StatusCode::CREATED, Json(UploadResponse { url })).into_response(),
        Err(e) => {
            tracing::error!("Image upload failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Image upload failed" })),
            )
                .into_response()
        }
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
