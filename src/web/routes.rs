//! Route definitions

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::HttpConfig;
use crate::AppState;

use super::api;
use super::ws;

/// Create the main router with all routes
pub fn create_router(app_state: Arc<AppState>, config: &HttpConfig) -> Router {
    let cors = if config.cors_enabled {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        // Bidirectional event stream (commands in, events out)
        .route("/ws", get(ws::ws_handler))
        // API endpoints (JSON)
        .route("/api/status", get(api::get_status))
        .route("/api/config", get(api::get_config))
        // Read-only SSE mirror of the event stream
        .route("/api/stream", get(api::event_stream))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
