//! handwave - Real-time Hand Gesture Event Stream Service
//!
//! A tokio service that:
//! - Paces a capture → detect → classify loop at a fixed frame rate
//! - Smooths noisy landmark samples and debounces gesture transitions
//! - Streams gesture, preview, and performance events over WebSocket

pub mod capture;
pub mod config;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod stream;
pub mod web;

pub use config::Config;
pub use error::{HandwaveError, Result};

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, RwLock};

use events::ServerEvent;
use stream::perf::PerfSnapshot;
use stream::session::{SessionCommand, SessionState};

/// Application state shared across all components
#[derive(Debug)]
pub struct AppState {
    /// Current configuration
    pub config: RwLock<Config>,
    /// Current session lifecycle state
    pub session_state: RwLock<SessionState>,
    /// Most recent performance snapshot
    pub last_perf: RwLock<Option<PerfSnapshot>>,
    /// Channel for outbound client events
    pub event_tx: broadcast::Sender<ServerEvent>,
    /// Control commands consumed by the session controller
    pub command_tx: mpsc::Sender<SessionCommand>,
    /// Shutdown signal
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Create the shared application state, returning the receiving end
    /// of the control-command channel for the session controller.
    pub fn new(config: Config) -> (Arc<Self>, mpsc::Receiver<SessionCommand>) {
        let (event_tx, _) = broadcast::channel(256);
        let (shutdown_tx, _) = broadcast::channel(1);
        let (command_tx, command_rx) = mpsc::channel(16);

        let state = Arc::new(Self {
            config: RwLock::new(config),
            session_state: RwLock::new(SessionState::Idle),
            last_perf: RwLock::new(None),
            event_tx,
            command_tx,
            shutdown_tx,
        });

        (state, command_rx)
    }

    /// Broadcast an event to all connected clients
    pub fn send_event(&self, event: ServerEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to outbound client events
    pub fn subscribe_events(&self) -> broadcast::Receiver<ServerEvent> {
        self.event_tx.subscribe()
    }

    /// Subscribe to shutdown signal
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Queue a control command for the session controller
    pub async fn send_command(&self, command: SessionCommand) {
        if self.command_tx.send(command).await.is_err() {
            tracing::warn!("Session controller is gone, dropping command");
        }
    }

    /// Get the current session state
    pub async fn session_state(&self) -> SessionState {
        *self.session_state.read().await
    }

    pub(crate) async fn set_session_state(&self, state: SessionState) {
        *self.session_state.write().await = state;
    }

    /// Get the most recent performance snapshot, if any
    pub async fn last_perf(&self) -> Option<PerfSnapshot> {
        *self.last_perf.read().await
    }

    pub(crate) async fn set_last_perf(&self, snapshot: PerfSnapshot) {
        *self.last_perf.write().await = Some(snapshot);
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
