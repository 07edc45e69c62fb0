//! HTTP handlers for the server.

pub mod print;
pub mod receipt;

use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::sync::Arc;

use super::state::AppState;

/// Handle GET /api/ping.
pub async fn ping() -> &'static str {
    log::debug!("ping");
    "pong"
}

/// Handle GET /api/printer - active geometry and print options.
pub async fn printer(State(state): State<Arc<AppState>>) -> Json<Value> {
    let config = state.service.config();
    Json(json!({
        "backend": state.service.backend_name(),
        "geometry": config.geometry,
        "width_dots": config.geometry.width_dots(),
        "options": config.options,
        "ready_timeout_ms": config.ready_timeout.as_millis() as u64,
    }))
}
