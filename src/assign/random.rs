//! Uniform random source seam for bucketing draws.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// Source of uniform draws in `[0, 1)`.
///
/// The assigner consumes draws through this trait so tests (and QA
/// tooling) can script the exact values a visitor would roll.
pub trait RandomSource: Send + Sync {
    /// Produce the next uniform value in `[0, 1)`.
    fn next_f64(&self) -> f64;
}

/// Production source backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl ThreadRngSource {
    /// Create a new thread-RNG source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RandomSource for ThreadRngSource {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Scripted source that replays a fixed sequence of draws.
///
/// Once the sequence is exhausted the last value repeats, so a one-value
/// script pins every subsequent draw. Useful for deterministic assignment
/// tests and preview tooling.
#[derive(Debug)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceSource {
    /// Create a source replaying `values` in order.
    ///
    /// An empty sequence degenerates to always returning 0.0.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Convenience constructor for a single pinned draw.
    #[must_use]
    pub fn fixed(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        let index = index.min(self.values.len() - 1);
        self.values[index]
    }
}
