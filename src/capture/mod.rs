//! Frame acquisition and collaborator seams
//!
//! The camera, the landmark detector, and the preview encoder are
//! external collaborators behind traits; the pipeline only depends on
//! the contracts here. A synthetic implementation lives in [`stub`] so
//! the service runs end-to-end without camera or ML dependencies.

pub mod stub;

use crate::error::CaptureError;
use crate::pipeline::HandSample;

/// An RGB24 frame buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CaptureError> {
        if pixels.len() != (width as usize) * (height as usize) * 3 {
            return Err(CaptureError::InvalidDimensions {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Flip horizontally (mirror effect for front-facing cameras).
    pub fn mirrored(&self) -> Frame {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut out = vec![0u8; self.pixels.len()];
        for y in 0..h {
            let row = y * w * 3;
            for x in 0..w {
                let src = row + x * 3;
                let dst = row + (w - 1 - x) * 3;
                out[dst..dst + 3].copy_from_slice(&self.pixels[src..src + 3]);
            }
        }
        Frame {
            width: self.width,
            height: self.height,
            pixels: out,
        }
    }

    /// Nearest-neighbor resize to the given dimensions.
    pub fn downsample(&self, width: u32, height: u32) -> Frame {
        let sw = self.width as usize;
        let sh = self.height as usize;
        let dw = width.max(1) as usize;
        let dh = height.max(1) as usize;

        let mut out = Vec::with_capacity(dw * dh * 3);
        for y in 0..dh {
            let sy = y * sh / dh;
            for x in 0..dw {
                let sx = x * sw / dw;
                let src = (sy * sw + sx) * 3;
                out.extend_from_slice(&self.pixels[src..src + 3]);
            }
        }
        Frame {
            width: dw as u32,
            height: dh as u32,
            pixels: out,
        }
    }
}

/// Camera/device frame source. An empty capture is a valid, non-fatal
/// result; the pacer simply retries next cycle.
pub trait FrameSource: Send {
    fn capture_frame(&mut self) -> Option<Frame>;
}

/// Hand landmark detector. Stateful and non-reentrant; exclusively owned
/// by the streaming worker while a session is running.
pub trait HandDetector: Send {
    /// Detect zero or more hands in a (detection-resolution) frame.
    fn detect(&mut self, frame: &Frame) -> Vec<HandSample>;
}

/// Preview frame encoder. Returns an opaque client-displayable payload
/// (e.g. a data URL).
pub trait PreviewEncoder: Send {
    fn encode(&mut self, frame: &Frame) -> Result<String, CaptureError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Frame {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(0);
            }
        }
        Frame::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_length() {
        assert!(Frame::new(4, 4, vec![0u8; 10]).is_err());
        assert!(Frame::new(4, 4, vec![0u8; 48]).is_ok());
    }

    #[test]
    fn test_mirror_swaps_columns() {
        let frame = gradient(4, 2);
        let mirrored = frame.mirrored();
        // First pixel of each row becomes the last
        assert_eq!(mirrored.pixels()[0], frame.pixels()[9]);
        // Mirroring twice restores the original
        assert_eq!(mirrored.mirrored(), frame);
    }

    #[test]
    fn test_downsample_dimensions() {
        let frame = gradient(8, 4);
        let small = frame.downsample(4, 2);
        assert_eq!(small.width, 4);
        assert_eq!(small.height, 2);
        assert_eq!(small.pixels().len(), 4 * 2 * 3);
    }

    #[test]
    fn test_downsample_picks_nearest() {
        let frame = gradient(8, 4);
        let small = frame.downsample(4, 2);
        // Destination (1, 1) maps to source (2, 2)
        let dst = (1 * 4 + 1) * 3;
        assert_eq!(small.pixels()[dst], 2);
        assert_eq!(small.pixels()[dst + 1], 2);
    }

    #[test]
    fn test_downsample_identity() {
        let frame = gradient(6, 3);
        assert_eq!(frame.downsample(6, 3), frame);
    }
}
