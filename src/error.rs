//! Error types for handwave

use thiserror::Error;

/// Main error type for handwave
#[derive(Error, Debug)]
pub enum HandwaveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Web server error: {0}")]
    Web(#[from] WebError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Frame source / detector / preview encoder collaborator errors
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Frame source initialization failed: {0}")]
    SourceInit(String),

    #[error("Detector initialization failed: {0}")]
    DetectorInit(String),

    #[error("Invalid frame dimensions: {width}x{height} with {len} bytes")]
    InvalidDimensions { width: u32, height: u32, len: usize },

    #[error("Preview encoding failed: {0}")]
    Encode(String),
}

/// Streaming session errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Worker task failed: {0}")]
    WorkerJoin(String),
}

/// Web server errors
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Failed to bind to address: {0}")]
    Bind(String),

    #[error("Server startup failed: {0}")]
    Startup(String),
}

/// Result type alias for handwave operations
pub type Result<T> = std::result::Result<T, HandwaveError>;
