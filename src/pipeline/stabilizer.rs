//! Gesture hysteresis
//!
//! Debounces the per-frame classifier output so the emitted gesture
//! stream does not flicker between types, while keeping latency low for
//! genuine transitions. Confidence builds while consecutive cycles agree
//! and decays on disagreement; candidates below the emission threshold
//! are reported as no-gesture rather than passed through.

use serde::Serialize;

use super::classifier::{Gesture, GestureKind};

/// A stabilized gesture with the confidence it was emitted at.
///
/// Serializes flat, e.g. `{"type":"pinch","distance":0.02,...,"confidence":0.3}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GestureEvent {
    #[serde(flatten)]
    pub gesture: Gesture,
    pub confidence: f32,
}

impl GestureEvent {
    /// The canonical no-gesture event emitted when nothing is detected
    /// or the candidate is suppressed.
    pub fn none() -> Self {
        Self {
            gesture: Gesture::None {
                extended_fingers: 0,
            },
            confidence: 0.0,
        }
    }
}

/// Hysteresis state machine over gesture candidates.
///
/// Matching the behavior the frontend was built against: the cycle in
/// which the candidate type changes decrements confidence and adopts the
/// new type, so a transition always starts from (at most) one decrement
/// below the previous streak. A non-none candidate is emitted once its
/// confidence clears `min_confidence`; everything else becomes the
/// canonical none event.
#[derive(Debug)]
pub struct ConfidenceStabilizer {
    last_kind: Option<GestureKind>,
    confidence: f32,
    min_confidence: f32,
    step: f32,
}

impl ConfidenceStabilizer {
    pub fn new(min_confidence: f32, step: f32) -> Self {
        Self {
            last_kind: None,
            confidence: 0.0,
            min_confidence,
            step,
        }
    }

    /// Fold one classifier candidate into the state and return the event
    /// to emit this cycle.
    pub fn stabilize(&mut self, candidate: Gesture) -> GestureEvent {
        let kind = candidate.kind();

        if self.last_kind == Some(kind) {
            self.confidence = (self.confidence + self.step).min(1.0);
        } else {
            self.confidence = (self.confidence - self.step).max(0.0);
            self.last_kind = Some(kind);
        }

        if kind != GestureKind::None && self.confidence >= self.min_confidence {
            GestureEvent {
                gesture: candidate,
                confidence: self.confidence,
            }
        } else {
            GestureEvent::none()
        }
    }

    /// Current confidence, always within [0, 1]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}
