use axum::{Extension, Json};
use chess_core::SharedModel;
use serde_json::{json, Value as JsonValue};

/// GET /health
pub async fn health_check(Extension(model): Extension<SharedModel>) -> Json<JsonValue> {
    Json(json!({
        "status": "ok",
        "model": model.name(),
    }))
}
