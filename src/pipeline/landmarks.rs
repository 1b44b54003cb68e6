//! Hand landmark types
//!
//! A detected hand is a fixed set of 21 normalized 3-D keypoints using the
//! MediaPipe Hands anatomical indexing (0 = wrist, 4 = thumb tip,
//! 8 = index tip, 12 = middle tip, 16 = ring tip, 20 = pinky tip).

use serde::{Deserialize, Serialize};

/// Number of landmarks per detected hand
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// One normalized keypoint. `x`/`y` are roughly in [0, 1] image space
/// (y grows downward); `z` is relative depth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// 3-D Euclidean distance to another landmark
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// 2-D midpoint with another landmark, in image space
    pub fn midpoint_xy(&self, other: &Landmark) -> [f32; 2] {
        [(self.x + other.x) / 2.0, (self.y + other.y) / 2.0]
    }
}

/// Which hand the sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

/// The full landmark set for one detected hand in one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandSample {
    pub landmarks: [Landmark; LANDMARK_COUNT],
    pub handedness: Handedness,
}

impl HandSample {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT], handedness: Handedness) -> Self {
        Self {
            landmarks,
            handedness,
        }
    }

    /// Centroid (x, y) of the wrist and the four finger MCP joints,
    /// used as a stable proxy for the palm center.
    pub fn palm_center(&self) -> [f32; 2] {
        let mut cx = 0.0;
        let mut cy = 0.0;
        for lm in &self.landmarks[0..5] {
            cx += lm.x;
            cy += lm.y;
        }
        [cx / 5.0, cy / 5.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(3.0, 4.0, 0.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);

        let c = Landmark::new(1.0, 2.0, 2.0);
        assert!((a.distance(&c) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_midpoint() {
        let a = Landmark::new(0.2, 0.4, 0.0);
        let b = Landmark::new(0.4, 0.8, 0.1);
        let mid = a.midpoint_xy(&b);
        assert!((mid[0] - 0.3).abs() < 1e-6);
        assert!((mid[1] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_palm_center() {
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (i, lm) in landmarks.iter_mut().enumerate().take(5) {
            lm.x = i as f32;
            lm.y = 1.0;
        }
        let sample = HandSample::new(landmarks, Handedness::Right);
        let center = sample.palm_center();
        assert!((center[0] - 2.0).abs() < 1e-6);
        assert!((center[1] - 1.0).abs() < 1e-6);
    }
}
