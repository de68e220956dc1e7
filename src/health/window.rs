//! Rolling latency window.
//!
//! # Responsibilities
//! - Keep the most recent N check latencies (FIFO eviction)
//! - Record failures as a zero sentinel so the check count is preserved
//! - Average only the samples strictly inside `(0, timeout)`
//!
//! The window is used for trend reporting only. Classification never reads it.

use std::collections::VecDeque;
use std::time::Duration;

use crate::health::classification::Classification;

/// Bounded buffer of recent latencies, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl LatencyWindow {
    /// Create an empty window. A zero capacity is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild a window from persisted samples, keeping only the newest `capacity`.
    pub fn from_samples(samples: impl IntoIterator<Item = f64>, capacity: usize) -> Self {
        let mut window = Self::new(capacity);
        for sample in samples {
            window.push_raw(sample);
        }
        window
    }

    /// Record the latency of one check.
    ///
    /// Only `Up` and `Slow` contribute their latency; anything else is stored as `0.0`.
    pub fn push(&mut self, latency: Duration, classification: Classification) {
        let sample = if classification.has_measured_latency() {
            latency.as_secs_f64()
        } else {
            0.0
        };
        self.push_raw(sample);
    }

    fn push_raw(&mut self, sample: f64) {
        // Negative or non-finite values can only come from a hand-edited file.
        let sample = if sample.is_finite() && sample > 0.0 { sample } else { 0.0 };
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Mean of samples strictly within `(0, timeout)` and how many there were.
    ///
    /// Returns `(0.0, 0)` when there are no valid samples.
    pub fn average(&self, timeout: Duration) -> (f64, usize) {
        let limit = timeout.as_secs_f64();
        let (sum, count) = self
            .samples
            .iter()
            .filter(|&&s| s > 0.0 && s < limit)
            .fold((0.0, 0usize), |(sum, count), &s| (sum + s, count + 1));

        if count == 0 {
            (0.0, 0)
        } else {
            (sum / count as f64, count)
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples oldest first.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }
}
