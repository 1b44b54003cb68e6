//! handwave - Real-time Hand Gesture Event Stream Service
//!
//! Main entry point for the CLI application.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use handwave::{
    capture::stub::{Base64PreviewEncoder, ScriptedDetector, SyntheticSource},
    config::Config,
    error::WebError,
    stream::{IoFactory, PacerIo, SessionCommand, SessionController},
    web::WebServer,
    AppState,
};

/// handwave - Real-time hand gesture event stream service
#[derive(Parser, Debug)]
#[command(name = "handwave", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable the HTTP server
    #[arg(long)]
    no_http: bool,

    /// Start streaming immediately instead of waiting for a client command
    #[arg(long)]
    autostart: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", handwave::NAME, handwave::VERSION);

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(port) = args.port {
        config.http.port = port;
    }
    config.validate()?;

    let capture_cfg = config.capture.clone();
    let http_enabled = config.http.enabled && !args.no_http;
    let (state, commands) = AppState::new(config);

    // Capture collaborators are built lazily, on the first start request
    let factory: IoFactory = Box::new(move || {
        Ok(PacerIo {
            source: Box::new(SyntheticSource::new(capture_cfg.width, capture_cfg.height)),
            detector: Box::new(ScriptedDetector::empty()),
            encoder: Box::new(Base64PreviewEncoder),
        })
    });

    let controller = SessionController::new(Arc::clone(&state), factory);
    let controller_task = tokio::spawn(controller.run(commands));

    if http_enabled {
        let http_state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = run_http_server(http_state).await {
                error!("HTTP server error: {}", e);
            }
        });
    }

    if args.autostart {
        state.send_command(SessionCommand::StartStream).await;
    }

    shutdown_signal().await;
    info!("Shutdown signal received");
    state.shutdown();

    // Let the controller stop any running stream cleanly
    let _ = controller_task.await;

    info!("handwave stopped");
    Ok(())
}

async fn run_http_server(state: Arc<AppState>) -> handwave::Result<()> {
    let config = state.config.read().await;
    let http_config = config.http.clone();
    drop(config);

    let web_server = WebServer::new(Arc::clone(&state), &http_config);

    let addr = format!("{}:{}", http_config.host, http_config.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WebError::Bind(format!("{}: {}", addr, e)))?;

    let mut shutdown_rx = state.subscribe_shutdown();

    axum::serve(listener, web_server.router())
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
        .map_err(|e| WebError::Startup(e.to_string()))?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handwave::error::HandwaveError;

    #[tokio::test]
    async fn test_http_server_bind_failure_is_reported() {
        // Occupy a port so the server cannot bind it
        let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let mut config = Config::default();
        config.http.port = port;
        let (state, _commands) = AppState::new(config);

        let err = run_http_server(state).await.unwrap_err();
        assert!(matches!(err, HandwaveError::Web(WebError::Bind(_))));
    }
}
