//! Rule-based gesture classification
//!
//! Pure geometric heuristics over a single smoothed [`HandSample`]; no
//! internal state. Gestures are matched in a strict priority order:
//! Point, Pinch, TwoFingers, OpenPalm, then None. Point is checked
//! before Pinch so that a pointing hand whose thumb drifts near the
//! index finger is not misread as a pinch; the `pinch_distance >=
//! threshold` guard on Point keeps the two mutually exclusive.

use serde::Serialize;

use super::landmarks::{
    HandSample, INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP,
    RING_PIP, RING_TIP, THUMB_IP, THUMB_TIP,
};

/// A classified gesture candidate with its geometric payload.
///
/// Positions and directions are 2-D image-space values; distances are
/// 3-D Euclidean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gesture {
    /// Index finger extended, others curled
    Point {
        /// Index fingertip position
        position: [f32; 2],
        /// Index MCP joint to fingertip
        direction: [f32; 2],
    },
    /// Thumb tip and index tip touching
    Pinch {
        distance: f32,
        /// Midpoint of thumb tip and index tip
        position: [f32; 2],
    },
    /// Index and middle fingers extended, ring and pinky curled
    TwoFingers {
        /// Midpoint of index and middle fingertips
        position: [f32; 2],
        distance: f32,
    },
    /// Four or more digits extended
    OpenPalm {
        /// Palm center (wrist + finger MCP centroid)
        position: [f32; 2],
        fingers_extended: u8,
    },
    /// No recognized gesture
    None { extended_fingers: u8 },
}

/// Discriminant-only view of a gesture, used for hysteresis comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Point,
    Pinch,
    TwoFingers,
    OpenPalm,
    None,
}

impl Gesture {
    pub fn kind(&self) -> GestureKind {
        match self {
            Gesture::Point { .. } => GestureKind::Point,
            Gesture::Pinch { .. } => GestureKind::Pinch,
            Gesture::TwoFingers { .. } => GestureKind::TwoFingers,
            Gesture::OpenPalm { .. } => GestureKind::OpenPalm,
            Gesture::None { .. } => GestureKind::None,
        }
    }
}

/// Per-digit extension state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingersUp {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingersUp {
    pub fn extended_count(&self) -> u8 {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
            .iter()
            .filter(|&&up| up)
            .count() as u8
    }
}

/// Detect which digits are extended.
///
/// Thumb: tip right of its IP joint (mirrored front-facing camera
/// convention; not handedness-aware). Other fingers: tip above the PIP
/// joint in image space (smaller y = higher = extended).
pub fn detect_fingers_up(sample: &HandSample) -> FingersUp {
    let lm = &sample.landmarks;

    FingersUp {
        thumb: lm[THUMB_TIP].x > lm[THUMB_IP].x,
        index: lm[INDEX_TIP].y < lm[INDEX_PIP].y,
        middle: lm[MIDDLE_TIP].y < lm[MIDDLE_PIP].y,
        ring: lm[RING_TIP].y < lm[RING_PIP].y,
        pinky: lm[PINKY_TIP].y < lm[PINKY_PIP].y,
    }
}

/// Classify a smoothed hand sample into a gesture candidate.
pub fn classify(sample: &HandSample, pinch_threshold: f32) -> Gesture {
    let lm = &sample.landmarks;
    let fingers = detect_fingers_up(sample);
    let extended = fingers.extended_count();

    let thumb_tip = lm[THUMB_TIP];
    let index_tip = lm[INDEX_TIP];
    let middle_tip = lm[MIDDLE_TIP];
    let pinch_distance = thumb_tip.distance(&index_tip);

    // Point before Pinch: first match wins
    if fingers.index
        && !fingers.middle
        && !fingers.ring
        && !fingers.pinky
        && pinch_distance >= pinch_threshold
    {
        return Gesture::Point {
            position: [index_tip.x, index_tip.y],
            direction: [
                index_tip.x - lm[INDEX_MCP].x,
                index_tip.y - lm[INDEX_MCP].y,
            ],
        };
    }

    if pinch_distance < pinch_threshold {
        return Gesture::Pinch {
            distance: pinch_distance,
            position: thumb_tip.midpoint_xy(&index_tip),
        };
    }

    if fingers.index && fingers.middle && !fingers.ring && !fingers.pinky {
        return Gesture::TwoFingers {
            position: index_tip.midpoint_xy(&middle_tip),
            distance: index_tip.distance(&middle_tip),
        };
    }

    if extended >= 4 {
        return Gesture::OpenPalm {
            position: sample.palm_center(),
            fingers_extended: extended,
        };
    }

    Gesture::None {
        extended_fingers: extended,
    }
}
