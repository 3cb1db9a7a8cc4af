//! Fullness sample buffer
//!
//! The engine produces an ordered sequence of (time, fullness) samples for
//! the persistence collaborator, truncated to a bounded window, roughly one
//! simulated week at typical tick density.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum retained samples (one simulated week at typical tick density)
pub const SAMPLE_CAPACITY: usize = 2200;

/// A single (simulated time, fullness) observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FullnessSample {
    /// Unbounded simulated hours since simulation start
    pub time: f64,
    /// Fullness level in [0, 1]
    pub fullness: f64,
}

/// Bounded, ordered buffer of fullness samples
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<FullnessSample>,
    capacity: usize,
}

impl SampleBuffer {
    /// Create a buffer with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(SAMPLE_CAPACITY)
    }

    /// Create a buffer with a custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self { samples: VecDeque::with_capacity(capacity), capacity }
    }

    /// Append a sample, dropping the oldest once at capacity
    pub fn push(&mut self, time: f64, fullness: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(FullnessSample { time, fullness });
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The most recent sample, if any
    pub fn latest(&self) -> Option<&FullnessSample> {
        self.samples.back()
    }

    /// Snapshot of the retained samples, oldest first
    pub fn to_vec(&self) -> Vec<FullnessSample> {
        self.samples.iter().copied().collect()
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_order() {
        let mut buffer = SampleBuffer::new();
        buffer.push(0.1, 0.0);
        buffer.push(0.2, 0.5);
        buffer.push(0.3, 0.4);

        let samples = buffer.to_vec();
        assert_eq!(samples.len(), 3);
        assert!(samples.windows(2).all(|pair| pair[0].time < pair[1].time));
        assert_eq!(buffer.latest().unwrap().fullness, 0.4);
    }

    #[test]
    fn test_truncates_to_capacity() {
        let mut buffer = SampleBuffer::with_capacity(5);
        for i in 0..20 {
            buffer.push(i as f64, 0.5);
        }
        assert_eq!(buffer.len(), 5);
        // Only the most recent samples survive
        assert_eq!(buffer.to_vec()[0].time, 15.0);
        assert_eq!(buffer.latest().unwrap().time, 19.0);
    }

    #[test]
    fn test_clear() {
        let mut buffer = SampleBuffer::new();
        buffer.push(1.0, 0.3);
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.latest().is_none());
    }

    #[test]
    fn test_sample_serde_round_trip() {
        let sample = FullnessSample { time: 12.5, fullness: 0.8 };
        let json = serde_json::to_string(&sample).unwrap();
        let back: FullnessSample = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, back);
    }
}
