//! Fixed-size window of duration samples for rolling averages

use std::time::Duration;

/// Keeps a running total so `average` does not rescan the window.
pub struct RingBuffer {
    samples: Vec<Duration>,
    capacity: usize,
    next: usize,
    total: Duration,
}

impl RingBuffer {
    /// `capacity` is clamped to at least one sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            next: 0,
            total: Duration::ZERO,
        }
    }

    pub fn push(&mut self, sample: Duration) {
        match self.samples.get_mut(self.next) {
            Some(slot) => {
                self.total = self.total.saturating_sub(*slot);
                *slot = sample;
            }
            None => self.samples.push(sample),
        }
        self.total += sample;
        self.next = (self.next + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recently pushed sample.
    pub fn latest(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let last = (self.next + self.capacity - 1) % self.capacity;
        self.samples.get(last).copied()
    }

    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        self.total / self.samples.len() as u32
    }

    pub fn min_max(&self) -> (Duration, Duration) {
        let min = self.samples.iter().min().copied().unwrap_or(Duration::ZERO);
        let max = self.samples.iter().max().copied().unwrap_or(Duration::ZERO);
        (min, max)
    }
}
