//! Wall-clock helpers for the coordinator.
use std::time::{Duration, Instant};

/// Becomes due once a fixed interval has elapsed since the last reset.
#[derive(Debug)]
pub struct CheckpointTimer {
    interval: Duration,
    start: Instant,
}

impl CheckpointTimer {
    /// Creates an armed timer.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            start: Instant::now(),
        }
    }

    /// Re-arms the timer from now.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }

    /// `true` if the interval has elapsed since the last reset.
    pub fn due(&self) -> bool {
        self.start.elapsed() >= self.interval
    }
}

/// Rate of change of a counter between two measurements.
#[derive(Debug)]
pub struct RateMeasure {
    count: u64,
    time: Instant,
}

impl RateMeasure {
    /// Starts measuring from `count`.
    pub fn new(count: u64) -> Self {
        Self {
            count,
            time: Instant::now(),
        }
    }

    /// Restarts measuring from `count`.
    pub fn reset(&mut self, count: u64) {
        self.count = count;
        self.time = Instant::now();
    }

    /// Counts per second since the last call (or reset), then restarts from `count`.
    pub fn measure(&mut self, count: u64) -> f32 {
        let secs = self.time.elapsed().as_secs_f32();
        let delta = count.saturating_sub(self.count);
        self.reset(count);
        if secs > 0.0 {
            delta as f32 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_checkpoint_timer() {
        let mut timer = CheckpointTimer::new(Duration::from_millis(100));
        assert!(!timer.due());

        sleep(Duration::from_millis(150));
        assert!(timer.due());

        timer.reset();
        assert!(!timer.due());
    }

    #[test]
    fn test_rate_measure() {
        let mut rate = RateMeasure::new(100);
        sleep(Duration::from_millis(100));
        let r = rate.measure(200);
        assert!(r > 0.0 && r <= 1000.0 + 1e-3, "{}", r);
        assert_eq!(rate.measure(200), 0.0);
    }
}
