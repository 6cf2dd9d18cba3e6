//! Progress counters shared between workers and the coordinator.
use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter.
#[derive(Debug, Default)]
pub struct SharedCounter(AtomicU64);

impl SharedCounter {
    /// Creates a counter starting at `v`.
    pub fn new(v: u64) -> Self {
        Self(AtomicU64::new(v))
    }

    /// Adds `n` and returns the new value.
    #[inline]
    pub fn increment(&self, n: u64) -> u64 {
        self.0.fetch_add(n, Ordering::Relaxed) + n
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Total environment steps and completed update cycles.
#[derive(Debug, Default)]
pub struct SharedCounters {
    /// Environment steps taken by all workers.
    pub steps: SharedCounter,

    /// Update cycles completed by all workers.
    pub updates: SharedCounter,
}

impl SharedCounters {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }
}
