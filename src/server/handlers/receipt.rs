//! Receipt preview handler.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::error::CupomError;
use crate::receipt::Receipt;

use super::super::state::AppState;

/// Handle POST /api/preview-receipt - write the receipt PDF and open it.
///
/// An empty body previews the demo receipt; otherwise the body is a
/// receipt as JSON.
pub async fn preview_receipt(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let receipt = if body.iter().all(u8::is_ascii_whitespace) {
        Receipt::demo()
    } else {
        match serde_json::from_slice::<Receipt>(&body) {
            Ok(receipt) => receipt,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"success": false, "error": format!("Invalid receipt: {}", e)})),
                );
            }
        }
    };

    let result = tokio::task::spawn_blocking(move || state.service.preview(&receipt)).await;

    match result {
        Ok(Ok(path)) => (
            StatusCode::OK,
            Json(json!({"success": true, "path": path})),
        ),
        Ok(Err(e)) => {
            let status = match e {
                CupomError::Receipt(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            log::error!("Preview failed: {}", e);
            (
                status,
                Json(json!({"success": false, "error": e.to_string()})),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "error": format!("Task error: {}", e)})),
        ),
    }
}
