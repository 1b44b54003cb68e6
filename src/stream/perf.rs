//! Throughput and latency accounting
//!
//! Per-cycle processing durations go into a bounded 60-sample ring; once
//! per rolling one-second window the monitor produces an fps/latency
//! snapshot and resets the window counters. The ring itself is never
//! cleared, its fixed capacity ages samples out.

use serde::Serialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of cycle durations retained for the latency average
const RING_CAPACITY: usize = 60;

/// Rolling performance snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerfSnapshot {
    /// Frames processed per second over the last window
    pub fps: f32,
    /// Mean cycle processing time in milliseconds over the ring
    pub avg_latency_ms: f32,
}

/// Aggregates cycle durations into once-per-second snapshots.
#[derive(Debug)]
pub struct PerfMonitor {
    ring: VecDeque<Duration>,
    frames: u32,
    window_start: Instant,
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self {
            ring: VecDeque::with_capacity(RING_CAPACITY),
            frames: 0,
            window_start: Instant::now(),
        }
    }

    /// Record one cycle's processing duration. Returns a snapshot when a
    /// full one-second window has elapsed.
    pub fn record(&mut self, cycle: Duration) -> Option<PerfSnapshot> {
        self.record_at(cycle, Instant::now())
    }

    fn record_at(&mut self, cycle: Duration, now: Instant) -> Option<PerfSnapshot> {
        self.ring.push_back(cycle);
        if self.ring.len() > RING_CAPACITY {
            self.ring.pop_front();
        }
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }

        let fps = self.frames as f64 / elapsed.as_secs_f64();
        let sum: Duration = self.ring.iter().sum();
        let avg_latency_ms = sum.as_secs_f64() / self.ring.len() as f64 * 1000.0;

        self.frames = 0;
        self.window_start = now;

        Some(PerfSnapshot {
            fps: round1(fps),
            avg_latency_ms: round1(avg_latency_ms),
        })
    }

    /// Samples currently in the latency ring
    pub fn ring_len(&self) -> usize {
        self.ring.len()
    }
}

impl Default for PerfMonitor {
    fn default() -> Self {
        Self::new()
    }
}

fn round1(value: f64) -> f32 {
    ((value * 10.0).round() / 10.0) as f32
}
