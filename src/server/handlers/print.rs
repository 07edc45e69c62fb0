//! Payload printing handler.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::error::CupomError;

use super::super::state::AppState;

/// Request body for POST /api/print-base64.
#[derive(Debug, Deserialize)]
pub struct PrintRequest {
    /// `data:<mime>;base64,...` or bare base64
    pub payload: String,
}

/// Handle POST /api/print-base64 - print a PDF or image payload.
pub async fn print_base64(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PrintRequest>,
) -> (StatusCode, Json<Value>) {
    match state.service.print_payload(&req.payload).await {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "job_id": report.job_id,
                "pages": report.pages,
                "page_size": report.page_size,
            })),
        ),
        Err(e) => {
            log::error!("Print failed: {}", e);
            let status = match e {
                CupomError::Payload(_) => StatusCode::BAD_REQUEST,
                CupomError::NotReady(_) => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(json!({"success": false, "error": e.to_string()})),
            )
        }
    }
}
