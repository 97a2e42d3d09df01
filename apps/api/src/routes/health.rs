use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Root health check; also points callers at the one real endpoint.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "ok": true,
        "message": "AI Learning Roadmap API",
        "docs": "POST /api/roadmap/generate"
    }))
}
