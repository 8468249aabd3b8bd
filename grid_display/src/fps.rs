// fps.rs - Sliding-window frame rate estimate

use std::collections::VecDeque;

/// Number of recent frames kept in the window.
pub const WINDOW_CAPACITY: usize = 100;

/// Deltas shorter than this are treated as this long. Caps a single sample
/// at 1000 fps and keeps a zero clock delta from dividing by zero.
const MIN_DELTA_MS: f64 = 1.0;

/// Rounded frames-per-second figures for the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FpsStats {
    pub latest: u32,
    pub avg: u32,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone)]
pub struct FpsMeter {
    last_timestamp: f64,
    frames: VecDeque<f64>,
}

impl FpsMeter {
    /// `now_ms` seeds the previous timestamp so the first sample has a real delta.
    pub fn new(now_ms: f64) -> Self {
        Self {
            last_timestamp: now_ms,
            frames: VecDeque::with_capacity(WINDOW_CAPACITY),
        }
    }

    /// Move the reference timestamp without touching the window, e.g. after a pause.
    pub fn reseed(&mut self, now_ms: f64) {
        self.last_timestamp = now_ms;
    }

    pub fn record(&mut self, now_ms: f64) -> FpsStats {
        let delta = (now_ms - self.last_timestamp).max(MIN_DELTA_MS);
        self.last_timestamp = now_ms;
        let latest = 1000.0 / delta;

        if self.frames.len() == WINDOW_CAPACITY {
            self.frames.pop_front();
        }
        self.frames.push_back(latest);

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &fps in &self.frames {
            min = min.min(fps);
            max = max.max(fps);
            sum += fps;
        }
        let avg = sum / self.frames.len() as f64;

        FpsStats {
            latest: latest.round() as u32,
            avg: avg.round() as u32,
            min: min.round() as u32,
            max: max.round() as u32,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Unrounded samples, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.frames.iter().copied()
    }
}
