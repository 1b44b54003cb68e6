//! Synthetic capture collaborators
//!
//! Camera-free implementations of the collaborator traits: a procedural
//! frame source, a detector that replays a scripted landmark sequence,
//! and a base64 preview encoder. Used by the default binary wiring and
//! by the pacer/session tests.

use base64::Engine;
use std::collections::VecDeque;

use super::{Frame, FrameSource, HandDetector, PreviewEncoder};
use crate::error::CaptureError;
use crate::pipeline::{HandSample, Handedness, Landmark, LANDMARK_COUNT};

/// Procedurally generated frame source. Produces a moving-gradient
/// pattern; optionally misses every `miss_every`-th capture to exercise
/// the pacer's skip path.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    counter: u64,
    miss_every: Option<u64>,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            counter: 0,
            miss_every: None,
        }
    }

    /// Return `None` from every `n`-th capture.
    pub fn with_miss_every(mut self, n: u64) -> Self {
        self.miss_every = Some(n.max(1));
        self
    }
}

impl FrameSource for SyntheticSource {
    fn capture_frame(&mut self) -> Option<Frame> {
        self.counter += 1;
        if let Some(n) = self.miss_every {
            if self.counter % n == 0 {
                return None;
            }
        }

        let phase = (self.counter % 256) as u8;
        let mut pixels = Vec::with_capacity((self.width * self.height * 3) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push((x % 256) as u8 ^ phase);
                pixels.push((y % 256) as u8);
                pixels.push(phase);
            }
        }
        // Dimensions are internally consistent by construction
        Frame::new(self.width, self.height, pixels).ok()
    }
}

/// Detector that replays a scripted sequence of per-frame detections.
/// Once the script is exhausted it keeps returning the last entry, or
/// detects nothing if constructed empty.
pub struct ScriptedDetector {
    script: VecDeque<Vec<HandSample>>,
    hold_last: Option<Vec<HandSample>>,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Vec<HandSample>>) -> Self {
        Self {
            script: script.into(),
            hold_last: None,
        }
    }

    /// A detector that never sees a hand.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// A detector that reports the same hand every frame.
    pub fn steady(sample: HandSample) -> Self {
        let mut detector = Self::new(vec![vec![sample]]);
        detector.hold_last = detector.script.front().cloned();
        detector
    }
}

impl HandDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &Frame) -> Vec<HandSample> {
        match self.script.pop_front() {
            Some(detections) => {
                self.hold_last = Some(detections.clone());
                detections
            }
            None => self.hold_last.clone().unwrap_or_default(),
        }
    }
}

/// Preview encoder that base64-encodes the raw pixel buffer into a data
/// URL. Real deployments plug a JPEG encoder behind the same trait.
pub struct Base64PreviewEncoder;

impl PreviewEncoder for Base64PreviewEncoder {
    fn encode(&mut self, frame: &Frame) -> Result<String, CaptureError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(frame.pixels());
        Ok(format!(
            "data:image/x-rgb24;w={};h={};base64,{}",
            frame.width, frame.height, encoded
        ))
    }
}

/// A neutral open-hand sample centered in the frame, handy for scripted
/// detectors in demos and tests.
pub fn neutral_hand() -> HandSample {
    let mut lm = [Landmark::default(); LANDMARK_COUNT];
    for (i, l) in lm.iter_mut().enumerate() {
        l.x = 0.4 + (i % 5) as f32 * 0.05;
        l.y = 0.8 - (i / 5) as f32 * 0.1;
        l.z = 0.0;
    }
    HandSample::new(lm, Handedness::Right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_source_produces_frames() {
        let mut source = SyntheticSource::new(32, 18);
        let frame = source.capture_frame().unwrap();
        assert_eq!(frame.width, 32);
        assert_eq!(frame.height, 18);

        // Consecutive frames differ (moving phase)
        let next = source.capture_frame().unwrap();
        assert_ne!(frame, next);
    }

    #[test]
    fn test_synthetic_source_misses() {
        let mut source = SyntheticSource::new(8, 8).with_miss_every(3);
        let mut missed = 0;
        for _ in 0..9 {
            if source.capture_frame().is_none() {
                missed += 1;
            }
        }
        assert_eq!(missed, 3);
    }

    #[test]
    fn test_scripted_detector_replays_then_holds() {
        let hand = neutral_hand();
        let mut detector =
            ScriptedDetector::new(vec![vec![], vec![hand.clone()], vec![hand.clone()]]);
        let frame = SyntheticSource::new(8, 8).capture_frame().unwrap();

        assert!(detector.detect(&frame).is_empty());
        assert_eq!(detector.detect(&frame).len(), 1);
        assert_eq!(detector.detect(&frame).len(), 1);
        // Script exhausted: keeps reporting the last entry
        assert_eq!(detector.detect(&frame).len(), 1);
    }

    #[test]
    fn test_empty_detector() {
        let mut detector = ScriptedDetector::empty();
        let frame = SyntheticSource::new(8, 8).capture_frame().unwrap();
        assert!(detector.detect(&frame).is_empty());
        assert!(detector.detect(&frame).is_empty());
    }

    #[test]
    fn test_base64_encoder() {
        let frame = SyntheticSource::new(4, 4).capture_frame().unwrap();
        let mut encoder = Base64PreviewEncoder;
        let payload = encoder.encode(&frame).unwrap();
        assert!(payload.starts_with("data:image/x-rgb24;w=4;h=4;base64,"));
    }
}
