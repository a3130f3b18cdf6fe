//! Frame timing utilities

use super::ring_buffer::RingBuffer;
use std::time::{Duration, Instant};

pub struct FrameTimer {
    frame_start: Instant,
    frame_times: RingBuffer,
    frames: u64,
}

impl FrameTimer {
    /// Track the last `capacity` frames.
    pub fn new(capacity: usize) -> Self {
        Self {
            frame_start: Instant::now(),
            frame_times: RingBuffer::new(capacity),
            frames: 0,
        }
    }

    pub fn begin(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Close the current frame and return its duration.
    pub fn end(&mut self) -> Duration {
        let elapsed = self.frame_start.elapsed();
        self.frame_times.push(elapsed);
        self.frames += 1;
        elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames per second over the sample window; zero before the first frame.
    pub fn fps(&self) -> f64 {
        match self.frame_time_ms() {
            ms if ms > 0.0 => 1000.0 / ms,
            _ => 0.0,
        }
    }

    /// Mean frame time over the sample window.
    pub fn frame_time_ms(&self) -> f64 {
        millis(self.frame_times.average())
    }

    /// Fastest and slowest frame in the sample window.
    pub fn frame_time_range_ms(&self) -> (f64, f64) {
        let (fastest, slowest) = self.frame_times.min_max();
        (millis(fastest), millis(slowest))
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1e3
}
