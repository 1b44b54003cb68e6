//! Gesture recognition pipeline
//!
//! Per-cycle processing of one raw hand sample:
//! smoothing → classification → hysteresis.

pub mod classifier;
pub mod landmarks;
pub mod smoother;
pub mod stabilizer;

pub use classifier::{classify, detect_fingers_up, FingersUp, Gesture, GestureKind};
pub use landmarks::{HandSample, Handedness, Landmark, LANDMARK_COUNT};
pub use smoother::LandmarkSmoother;
pub use stabilizer::{ConfidenceStabilizer, GestureEvent};

use crate::config::PipelineConfig;

/// Full per-hand gesture pipeline combining the smoother, the pure
/// classifier, and the confidence stabilizer.
///
/// Built fresh per streaming session; mutated by exactly one worker task.
#[derive(Debug)]
pub struct GesturePipeline {
    smoother: LandmarkSmoother,
    stabilizer: ConfidenceStabilizer,
    pinch_threshold: f32,
}

impl GesturePipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            smoother: LandmarkSmoother::new(config.smoothing_window),
            stabilizer: ConfidenceStabilizer::new(
                config.min_confidence,
                config.confidence_step,
            ),
            pinch_threshold: config.pinch_threshold,
        }
    }

    /// Process one raw hand sample into the gesture event for this cycle.
    pub fn process(&mut self, raw: HandSample) -> GestureEvent {
        let smoothed = self.smoother.smooth(raw);
        let candidate = classify(&smoothed, self.pinch_threshold);
        self.stabilizer.stabilize(candidate)
    }
}
