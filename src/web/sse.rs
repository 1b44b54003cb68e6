//! Server-Sent Events mirror of the gesture event stream
//!
//! Read-only alternative to the WebSocket for clients that only
//! consume events and never send commands.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::events::ServerEvent;
use crate::AppState;

/// Create an SSE stream of gesture, preview, and performance events
pub fn create_event_stream(
    app_state: Arc<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = app_state.subscribe_events();

    // Convert broadcast receiver to a stream
    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(server_event_to_sse(&event))),
        Err(_) => None, // Skip lagged messages
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn server_event_to_sse(event: &ServerEvent) -> Event {
    let name = match event {
        ServerEvent::Connected => "connected",
        ServerEvent::StreamStarted => "stream_started",
        ServerEvent::StreamStopped => "stream_stopped",
        ServerEvent::Error { .. } => "error",
        ServerEvent::CameraFrame { .. } => "camera_frame",
        ServerEvent::Performance { .. } => "performance",
    };
    let data = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());

    Event::default().event(name).data(data)
}
