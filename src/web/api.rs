//! REST API endpoints

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::web::sse;
use crate::AppState;

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub session: String,
    pub fps: Option<f32>,
    pub latency_ms: Option<f32>,
    pub version: String,
}

/// Get current status
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session_state().await;
    let perf = state.last_perf().await;

    ApiResponse::success(StatusResponse {
        session: session.to_string(),
        fps: perf.map(|p| p.fps),
        latency_ms: perf.map(|p| p.avg_latency_ms),
        version: crate::VERSION.to_string(),
    })
}

/// Get current configuration
pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.config.read().await;
    Json(config.clone())
}

/// SSE stream endpoint
pub async fn event_stream(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    sse::create_event_stream(state)
}
