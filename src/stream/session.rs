//! Session lifecycle
//!
//! A single controller task owns the capture collaborators and mediates
//! every start/stop request over a command channel, so concurrent
//! clients can never race the camera into a bad state. Collaborators
//! are initialized lazily on the first start and reused across
//! sessions.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::{HandwaveError, SessionError};
use crate::events::ServerEvent;
use crate::stream::pacer::{PacerIo, StreamPacer};
use crate::AppState;

/// Lifecycle of the streaming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Starting,
    Running,
    Stopping,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::Starting => "starting",
            SessionState::Running => "running",
            SessionState::Stopping => "stopping",
        };
        write!(f, "{}", s)
    }
}

/// Requests clients can make against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    StartStream,
    StopStream,
}

/// Builds the capture collaborators on first use. Fallible: a missing
/// camera or detector model surfaces here, not at process startup.
pub type IoFactory = Box<dyn FnMut() -> Result<PacerIo, HandwaveError> + Send>;

pub struct SessionController {
    state: Arc<AppState>,
    factory: IoFactory,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<PacerIo>>,
    /// Collaborators parked between sessions.
    io: Option<PacerIo>,
}

impl SessionController {
    pub fn new(state: Arc<AppState>, factory: IoFactory) -> Self {
        Self {
            state,
            factory,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            io: None,
        }
    }

    /// Process commands until the channel closes or shutdown fires.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) {
        let mut shutdown_rx = self.state.subscribe_shutdown();
        info!("Session controller started");

        loop {
            tokio::select! {
                cmd = commands.recv() => {
                    match cmd {
                        Some(SessionCommand::StartStream) => self.handle_start().await,
                        Some(SessionCommand::StopStream) => self.handle_stop().await,
                        None => {
                            warn!("Command channel closed, stopping session controller");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown received, stopping session controller");
                    break;
                }
            }
        }

        if self.state.session_state().await == SessionState::Running {
            self.handle_stop().await;
        }
    }

    async fn handle_start(&mut self) {
        // Redundant starts are no-ops, nothing is broadcast
        if self.state.session_state().await == SessionState::Running {
            info!("Stream already running, ignoring start request");
            return;
        }

        self.state.set_session_state(SessionState::Starting).await;

        let io = match self.take_io() {
            Ok(io) => io,
            Err(e) => {
                error!("Failed to initialize capture: {}", e);
                self.state
                    .send_event(ServerEvent::error(format!("Failed to start stream: {}", e)));
                self.state.set_session_state(SessionState::Idle).await;
                return;
            }
        };

        let config = self.state.config.read().await;
        let pipeline_cfg = config.pipeline.clone();
        let capture_cfg = config.capture.clone();
        drop(config);

        self.running.store(true, Ordering::Relaxed);
        self.state.set_session_state(SessionState::Running).await;
        // Ack before the first pacer cycle so clients see stream_started
        // ahead of any camera_frame
        self.state.send_event(ServerEvent::StreamStarted);

        let pacer = StreamPacer::new(
            Arc::clone(&self.state),
            io,
            Arc::clone(&self.running),
            pipeline_cfg,
            capture_cfg,
        );
        self.worker = Some(tokio::spawn(pacer.run()));
        info!("Stream started");
    }

    async fn handle_stop(&mut self) {
        if self.state.session_state().await != SessionState::Running {
            info!("Stream not running, ignoring stop request");
            return;
        }

        self.state.set_session_state(SessionState::Stopping).await;
        self.running.store(false, Ordering::Relaxed);

        if let Some(worker) = self.worker.take() {
            match worker.await {
                Ok(io) => self.io = Some(io),
                Err(e) => {
                    // Collaborators are lost with the panicked task; the
                    // factory rebuilds them on the next start
                    let err = HandwaveError::from(SessionError::WorkerJoin(e.to_string()));
                    error!("{}", err);
                    self.state.send_event(ServerEvent::error(err.to_string()));
                }
            }
        }

        self.state.set_session_state(SessionState::Idle).await;
        self.state.send_event(ServerEvent::StreamStopped);
        info!("Stream stopped");
    }

    /// Reuse parked collaborators if a previous session left any,
    /// otherwise build fresh ones.
    fn take_io(&mut self) -> Result<PacerIo, HandwaveError> {
        match self.io.take() {
            Some(io) => Ok(io),
            None => (self.factory)(),
        }
    }
}
