use std::sync::Arc;

use axum::response::{IntoResponse, Json};
use axum::routing::post;
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use stead_core::GatewayError;
use stead_storage::{ObjectStorage, Uploader};

use crate::routes::ApiError;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/upload", post(upload))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadBody {
    /// Base64-encoded file contents.
    file: String,
    filename: String,
    content_type: String,
}

async fn upload(Json(body): Json<UploadBody>) -> Result<impl IntoResponse, ApiError> {
    let buffer = BASE64
        .decode(body.file.as_bytes())
        .map_err(|e| ApiError::validation(format!("file is not valid base64: {e}")))?;

    let storage =
        ObjectStorage::from_env().map_err(|e| GatewayError::config(e.to_string()))?;
    let url = storage
        .upload(&buffer, &body.filename, &body.content_type)
        .await
        .map_err(|e| GatewayError::upload(e.to_string()))?;

    Ok(Json(json!({ "url": url })))
}
