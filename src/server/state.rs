//! Server state and configuration.

use crate::service::PrintService;

/// Default loopback address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8731";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:8731")
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub service: PrintService,
}

impl AppState {
    pub fn new(service: PrintService) -> Self {
        Self { service }
    }
}
