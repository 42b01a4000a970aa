//! Throttled spectrum sampling.
//!
//! The audio thread ticks once per frame; the sampler decides which of those
//! ticks actually read the analyzer.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FrequencySampler {
    interval: Duration,
    last_sample: Option<Instant>,
    running: bool,
}

impl FrequencySampler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sample: None,
            running: false,
        }
    }

    /// Schedule sampling. The next `due` call fires immediately.
    pub fn start(&mut self) {
        self.running = true;
        self.last_sample = None;
    }

    /// Drop the pending schedule.
    pub fn cancel(&mut self) {
        self.running = false;
        self.last_sample = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether this tick should sample. Records `now` when it returns true.
    pub fn due(&mut self, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        let ready = match self.last_sample {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if ready {
            self.last_sample = Some(now);
        }
        ready
    }
}
