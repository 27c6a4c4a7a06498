use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde_json::json;

use stead_core::collections;
use stead_store::QueryOptions;

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store_ok = state
        .store
        .query(collections::PROPERTIES, QueryOptions::default().with_limit(1))
        .await
        .is_ok();
    Json(json!({ "status": "ok", "store": store_ok }))
}
