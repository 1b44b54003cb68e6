//! WebSocket event stream
//!
//! Bidirectional endpoint: clients send control commands as JSON text
//! frames and receive the full gesture/preview/performance event
//! stream. Every connection gets its own broadcast subscription, so a
//! slow client only loses its own messages.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::events::ServerEvent;
use crate::stream::session::SessionCommand;
use crate::AppState;

/// Control commands a client can send over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ClientCommand {
    StartStream,
    StopStream,
}

impl From<ClientCommand> for SessionCommand {
    fn from(cmd: ClientCommand) -> Self {
        match cmd {
            ClientCommand::StartStream => SessionCommand::StartStream,
            ClientCommand::StopStream => SessionCommand::StopStream,
        }
    }
}

pub async fn ws_handler(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    info!("WebSocket client connected");

    // Connection acknowledgement, sent only to this client
    if send_event(&mut sender, &ServerEvent::Connected).await.is_err() {
        return;
    }

    let mut events = state.subscribe_events();
    let mut shutdown_rx = state.subscribe_shutdown();

    loop {
        tokio::select! {
            result = events.recv() => {
                match result {
                    Ok(event) => {
                        if send_event(&mut sender, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("WebSocket client lagged, {} events dropped", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_message(&text, &state).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client closed connection");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary/ping/pong frames carry no commands
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket receive error: {}", e);
                        break;
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        }
    }

    info!("WebSocket client disconnected");
}

async fn send_event(
    sender: &mut (impl SinkExt<Message> + Unpin),
    event: &ServerEvent,
) -> Result<(), ()> {
    match serde_json::to_string(event) {
        Ok(json) => sender.send(Message::Text(json)).await.map_err(|_| ()),
        Err(e) => {
            warn!("Failed to serialize event: {}", e);
            Ok(())
        }
    }
}

async fn handle_client_message(text: &str, state: &Arc<AppState>) {
    match serde_json::from_str::<ClientCommand>(text) {
        Ok(cmd) => {
            debug!("Client command: {:?}", cmd);
            state.send_command(cmd.into()).await;
        }
        Err(e) => {
            warn!("Unrecognized client message: {}", e);
            state.send_event(ServerEvent::error(format!("Unrecognized command: {}", e)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_command_parsing() {
        let cmd: ClientCommand = serde_json::from_str(r#"{"command":"start_stream"}"#).unwrap();
        assert!(matches!(cmd, ClientCommand::StartStream));

        let cmd: ClientCommand = serde_json::from_str(r#"{"command":"stop_stream"}"#).unwrap();
        assert!(matches!(cmd, ClientCommand::StopStream));
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(serde_json::from_str::<ClientCommand>(r#"{"command":"reboot"}"#).is_err());
        assert!(serde_json::from_str::<ClientCommand>("not json").is_err());
    }

    #[test]
    fn test_command_conversion() {
        assert_eq!(
            SessionCommand::from(ClientCommand::StartStream),
            SessionCommand::StartStream
        );
        assert_eq!(
            SessionCommand::from(ClientCommand::StopStream),
            SessionCommand::StopStream
        );
    }
}
