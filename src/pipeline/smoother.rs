//! Temporal landmark smoothing
//!
//! Moving-average filter over the most recent hand samples to reduce
//! per-frame detector jitter before classification.

use std::collections::VecDeque;

use super::landmarks::{HandSample, Landmark, LANDMARK_COUNT};

/// Bounded-window moving-average filter over raw landmark samples.
///
/// Holds up to `window` recent samples; each call appends the new sample,
/// evicts the oldest on overflow, and returns the per-index arithmetic
/// mean across the window. With fewer than 2 samples buffered the raw
/// sample is returned unchanged.
///
/// The window is never cleared when the hand disappears mid-session; a
/// fresh smoother is built per streaming session instead.
#[derive(Debug)]
pub struct LandmarkSmoother {
    window: usize,
    history: VecDeque<HandSample>,
}

impl LandmarkSmoother {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            history: VecDeque::with_capacity(window.max(1)),
        }
    }

    /// Append `raw` to the window and return the smoothed sample.
    pub fn smooth(&mut self, raw: HandSample) -> HandSample {
        self.history.push_back(raw.clone());
        if self.history.len() > self.window {
            self.history.pop_front();
        }

        if self.history.len() < 2 {
            return raw;
        }

        let n = self.history.len() as f32;
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (i, out) in landmarks.iter_mut().enumerate() {
            for sample in &self.history {
                out.x += sample.landmarks[i].x;
                out.y += sample.landmarks[i].y;
                out.z += sample.landmarks[i].z;
            }
            out.x /= n;
            out.y /= n;
            out.z /= n;
        }

        HandSample::new(landmarks, raw.handedness)
    }

    /// Number of samples currently buffered
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::landmarks::Handedness;

    fn uniform_sample(value: f32) -> HandSample {
        HandSample::new(
            [Landmark::new(value, value, value); LANDMARK_COUNT],
            Handedness::Right,
        )
    }

    #[test]
    fn test_first_sample_passthrough() {
        let mut smoother = LandmarkSmoother::new(6);
        let raw = uniform_sample(0.42);
        let out = smoother.smooth(raw.clone());
        assert_eq!(out, raw);
    }

    #[test]
    fn test_moving_average() {
        let mut smoother = LandmarkSmoother::new(6);
        smoother.smooth(uniform_sample(0.0));
        let out = smoother.smooth(uniform_sample(1.0));
        // mean of 0.0 and 1.0
        assert!((out.landmarks[0].x - 0.5).abs() < 1e-6);
        assert!((out.landmarks[20].z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_identical_samples_converge_exactly() {
        // A window full of identical samples must reproduce the raw sample
        let mut smoother = LandmarkSmoother::new(6);
        let raw = uniform_sample(0.37);
        let mut out = raw.clone();
        for _ in 0..10 {
            out = smoother.smooth(raw.clone());
        }
        for i in 0..LANDMARK_COUNT {
            assert!((out.landmarks[i].x - raw.landmarks[i].x).abs() < 1e-6);
            assert!((out.landmarks[i].y - raw.landmarks[i].y).abs() < 1e-6);
            assert!((out.landmarks[i].z - raw.landmarks[i].z).abs() < 1e-6);
        }
    }

    #[test]
    fn test_window_bound_holds() {
        let mut smoother = LandmarkSmoother::new(6);
        for i in 0..100 {
            smoother.smooth(uniform_sample(i as f32 / 100.0));
            assert!(smoother.len() <= 6);
        }
        assert_eq!(smoother.len(), 6);
    }

    #[test]
    fn test_eviction_drops_oldest() {
        let mut smoother = LandmarkSmoother::new(2);
        smoother.smooth(uniform_sample(0.0));
        smoother.smooth(uniform_sample(0.2));
        // Window is now [0.2, 0.4]; the 0.0 sample must be gone
        let out = smoother.smooth(uniform_sample(0.4));
        assert!((out.landmarks[0].x - 0.3).abs() < 1e-6);
    }
}
