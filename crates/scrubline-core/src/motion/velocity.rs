//! Velocity estimation from raw input samples
//!
//! Deliberately unfiltered: velocity is the slope between the two most
//! recent samples. Smoothing, when wanted, happens downstream in the decay.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Number of samples retained by a `SampleWindow`
pub const WINDOW_SIZE: usize = 3;

/// One raw input reading (pointer position or scroll offset)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSample {
    pub position: f64,
    pub timestamp_ms: f64,
}

impl InputSample {
    pub const fn new(position: f64, timestamp_ms: f64) -> Self {
        Self {
            position,
            timestamp_ms,
        }
    }
}

/// Signed velocity in position units per millisecond
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VelocityEstimate {
    pub value: f64,
}

impl VelocityEstimate {
    pub const ZERO: Self = Self { value: 0.0 };

    pub const fn new(value: f64) -> Self {
        Self { value }
    }
}

pub struct VelocitySampler;

impl VelocitySampler {
    /// Instantaneous velocity between `previous` and `current`
    ///
    /// Returns zero for the first sample of a gesture and whenever the
    /// timestamps do not advance (duplicate or reordered events).
    pub fn sample(current: InputSample, previous: Option<InputSample>) -> VelocityEstimate {
        let Some(previous) = previous else {
            return VelocityEstimate::ZERO;
        };

        let dt = current.timestamp_ms - previous.timestamp_ms;
        if dt <= 0.0 || !dt.is_finite() {
            return VelocityEstimate::ZERO;
        }

        let value = (current.position - previous.position) / dt;
        if value.is_finite() {
            VelocityEstimate::new(value)
        } else {
            VelocityEstimate::ZERO
        }
    }

    /// True when `current` does not advance past `previous` in time
    pub fn is_stale(current: &InputSample, previous: &InputSample) -> bool {
        current.timestamp_ms - previous.timestamp_ms <= 0.0
    }
}

/// The last few samples of the current gesture
#[derive(Debug, Clone, Default)]
pub struct SampleWindow {
    samples: VecDeque<InputSample>,
}

impl SampleWindow {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(WINDOW_SIZE),
        }
    }

    /// Record a sample, dropping the oldest beyond the window size
    pub fn push(&mut self, sample: InputSample) {
        if self.samples.len() == WINDOW_SIZE {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn latest(&self) -> Option<InputSample> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Forget the gesture (next sample starts fresh)
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
