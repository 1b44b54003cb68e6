//! Configuration parsing and management for handwave

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, HandwaveError};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub capture: CaptureConfig,
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            capture: CaptureConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HandwaveError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> Result<Self, HandwaveError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, HandwaveError> {
        let paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("config/default.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), HandwaveError> {
        if self.pipeline.target_fps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.target_fps".to_string(),
                message: "Target FPS must be greater than 0".to_string(),
            }
            .into());
        }

        if self.pipeline.smoothing_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.smoothing_window".to_string(),
                message: "Smoothing window must hold at least 1 sample".to_string(),
            }
            .into());
        }

        if self.pipeline.preview_skip == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.preview_skip".to_string(),
                message: "Preview skip must be greater than 0".to_string(),
            }
            .into());
        }

        if !(0.0..1.0).contains(&self.pipeline.pinch_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.pinch_threshold".to_string(),
                message: "Pinch threshold must be in [0.0, 1.0)".to_string(),
            }
            .into());
        }

        if !(0.0..=1.0).contains(&self.pipeline.min_confidence) {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.min_confidence".to_string(),
                message: "Minimum confidence must be between 0.0 and 1.0".to_string(),
            }
            .into());
        }

        if !(0.0..=1.0).contains(&self.pipeline.confidence_step)
            || self.pipeline.confidence_step == 0.0
        {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.confidence_step".to_string(),
                message: "Confidence step must be in (0.0, 1.0]".to_string(),
            }
            .into());
        }

        for (field, value) in [
            ("capture.width", self.capture.width),
            ("capture.height", self.capture.height),
            ("capture.detect_width", self.capture.detect_width),
            ("capture.detect_height", self.capture.detect_height),
            ("capture.preview_width", self.capture.preview_width),
            ("capture.preview_height", self.capture.preview_height),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "Dimension must be greater than 0".to_string(),
                }
                .into());
            }
        }

        if self.http.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.port".to_string(),
                message: "Port must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Gesture pipeline tuning.
///
/// The defaults are the classifier constants the frontend was calibrated
/// against; they are exposed in config for experimentation but are not
/// negotiated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Target frame rate for the pacer loop
    pub target_fps: u32,
    /// Moving-average window size for landmark smoothing
    pub smoothing_window: usize,
    /// Emit a preview frame every Nth cycle
    pub preview_skip: u64,
    /// Thumb-tip to index-tip distance below which a pinch is detected
    pub pinch_threshold: f32,
    /// Confidence a gesture must reach before it is reported
    pub min_confidence: f32,
    /// Confidence gained/lost per cycle of agreement/disagreement
    pub confidence_step: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            smoothing_window: 6,
            preview_skip: 2,
            pinch_threshold: 0.05,
            min_confidence: 0.2,
            confidence_step: 0.15,
        }
    }
}

/// Frame capture and resize configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Full capture resolution
    pub width: u32,
    pub height: u32,
    /// Detection resolution (small frame handed to the detector)
    pub detect_width: u32,
    pub detect_height: u32,
    /// Preview resolution (frame handed to the preview encoder)
    pub preview_width: u32,
    pub preview_height: u32,
    /// Mirror frames horizontally (front-facing camera convention the
    /// thumb-extension rule depends on)
    pub mirror: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            detect_width: 320,
            detect_height: 180,
            preview_width: 480,
            preview_height: 270,
            mirror: true,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Enable HTTP server
    pub enabled: bool,
    /// HTTP server host
    pub host: String,
    /// HTTP server port
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_enabled: true,
        }
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("handwave");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/handwave");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/handwave");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("handwave");
        }
    }

    PathBuf::from(".")
}
