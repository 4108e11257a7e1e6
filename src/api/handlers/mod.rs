//! Route handlers, one module per resource.

pub mod auth;
pub mod comments;
pub mod tasks;

use axum::Json;
use serde_json::{Value, json};

/// `GET /health`.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
