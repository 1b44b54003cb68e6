//! Outbound event vocabulary
//!
//! Everything the service pushes to clients, fanned out over the
//! broadcast channel and serialized as tagged JSON on the wire.

use serde::Serialize;

use crate::pipeline::GestureEvent;
use crate::stream::perf::PerfSnapshot;

/// An event pushed to connected clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Connection acknowledged
    Connected,
    /// Streaming session started
    StreamStarted,
    /// Streaming session stopped
    StreamStopped,
    /// Non-fatal failure (e.g. collaborator initialization)
    Error { message: String },
    /// One pacer cycle: the stabilized gesture, the capture timestamp
    /// (seconds since the Unix epoch), and on preview cycles the encoded
    /// preview payload
    CameraFrame {
        gesture: GestureEvent,
        timestamp: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        frame: Option<String>,
    },
    /// Rolling throughput/latency snapshot, once per second
    Performance { fps: f32, latency: f32 },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Current wall-clock time as seconds since the Unix epoch.
pub fn unix_timestamp() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

impl From<PerfSnapshot> for ServerEvent {
    fn from(snap: PerfSnapshot) -> Self {
        Self::Performance {
            fps: snap.fps,
            latency: snap.avg_latency_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tags() {
        let json = serde_json::to_value(ServerEvent::Connected).unwrap();
        assert_eq!(json["event"], "connected");

        let json = serde_json::to_value(ServerEvent::StreamStarted).unwrap();
        assert_eq!(json["event"], "stream_started");

        let json = serde_json::to_value(ServerEvent::error("nope")).unwrap();
        assert_eq!(json["event"], "error");
        assert_eq!(json["message"], "nope");
    }

    #[test]
    fn test_camera_frame_omits_empty_preview() {
        let ev = ServerEvent::CameraFrame {
            gesture: GestureEvent::none(),
            timestamp: 1_700_000_000.0,
            frame: None,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "camera_frame");
        assert_eq!(json["gesture"]["type"], "none");
        assert!(json.get("frame").is_none());

        let ev = ServerEvent::CameraFrame {
            gesture: GestureEvent::none(),
            timestamp: 1_700_000_000.0,
            frame: Some("data:image/jpeg;base64,abcd".to_string()),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert!(json["frame"].as_str().unwrap().starts_with("data:image"));
    }

    #[test]
    fn test_timestamp_monotonic_enough() {
        let a = unix_timestamp();
        let b = unix_timestamp();
        assert!(b >= a);
        assert!(a > 1_600_000_000.0);
    }
}
