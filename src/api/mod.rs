//! API module - HTTP handlers and routes for the local control panel

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::dispatch::Panel;

/// Shared panel state handed to every handler
#[derive(Clone)]
pub struct PanelState {
    pub panel: Arc<Panel>,
}

impl PanelState {
    pub fn new(panel: Panel) -> Self {
        Self {
            panel: Arc::new(panel),
        }
    }
}

pub fn routes(state: PanelState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::health_check))
        // Panel page
        .route("/", get(handlers::index_page))
        // Devices
        .route("/api/devices", get(handlers::list_devices))
        .route("/api/devices/:index/:action", post(handlers::trigger_action))
        // Status line
        .route("/api/status", get(handlers::get_status))
        .with_state(state)
}

/// Served instead of the panel when the configuration could not be loaded
pub fn config_error_routes(message: String) -> Router {
    let message = Arc::new(message);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::health_check))
        .fallback(handlers::config_error_page)
        .with_state(message)
}
