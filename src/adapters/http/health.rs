//! Liveness endpoint.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Builds the health router.
pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}
