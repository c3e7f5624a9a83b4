use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::api::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Readiness plus the defaults a bare `POST /v1/admin/recalculate` would use.
pub async fn ready(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ready",
        "defaultMode": state.config.recalc_mode,
        "defaultTolerance": state.config.drift_tolerance,
        "concurrency": state.config.recalc_concurrency,
    }))
}
