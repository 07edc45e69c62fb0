//! # Local RPC Server
//!
//! Exposes the print service to the UI process over HTTP on a loopback
//! address.
//!
//! ## Usage
//!
//! ```bash
//! cupom serve --listen 127.0.0.1:8731 --backend spooler --destination Thermal_80
//! ```
//!
//! ## Routes
//!
//! | Route | Method | Purpose |
//! |-------|--------|---------|
//! | `/api/ping` | GET | Liveness check |
//! | `/api/printer` | GET | Active geometry and print options |
//! | `/api/print-base64` | POST | Print a data-URL payload |
//! | `/api/preview-receipt` | POST | Write and open a receipt PDF |

mod handlers;
mod state;

pub use state::{AppState, DEFAULT_LISTEN_ADDR, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

use crate::error::CupomError;
use crate::service::PrintService;

/// Largest accepted print payload (data URLs inflate binaries by 4/3)
const MAX_PAYLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the router for a service.
pub fn router(service: PrintService) -> Router {
    let app_state = Arc::new(AppState::new(service));

    Router::new()
        .route("/api/ping", get(handlers::ping))
        .route("/api/printer", get(handlers::printer))
        .route(
            "/api/print-base64",
            post(handlers::print::print_base64).layer(DefaultBodyLimit::max(MAX_PAYLOAD_BYTES)),
        )
        .route(
            "/api/preview-receipt",
            post(handlers::receipt::preview_receipt),
        )
        .with_state(app_state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use cupom::server::{serve, ServerConfig};
/// use cupom::service::{PrintService, ServiceConfig};
/// use cupom::transport::RecordingBackend;
///
/// # async fn example() -> Result<(), cupom::CupomError> {
/// let service = PrintService::new(ServiceConfig::default(), RecordingBackend::new());
/// serve(ServerConfig::default(), service).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig, service: PrintService) -> Result<(), CupomError> {
    log::info!("Cupom print server starting");
    log::info!("Listening on: {}", config.listen_addr);
    log::info!(
        "Backend: {} ({})",
        service.backend_name(),
        service
            .config()
            .options
            .destination
            .as_deref()
            .unwrap_or("system default")
    );

    let app = router(service);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            CupomError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| CupomError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
