//! Frame time tracking
//!
//! Turns wall-clock frame durations into the `delta_time` handed to
//! `World::update`, clamping long stalls so systems never see a huge step.

use std::time::Duration;

/// Nominal frame rate used when no measurement is available (60 Hz).
pub const TICK_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Longest step a single frame may report.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

pub struct FrameClock {
    frame_count: u64,
    total_time: Duration,
    last_delta: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            total_time: Duration::ZERO,
            last_delta: Duration::ZERO,
        }
    }

    /// Record a frame of length `elapsed` and return the delta in seconds.
    pub fn advance(&mut self, elapsed: Duration) -> f32 {
        let delta = elapsed.min(MAX_FRAME_DELTA);
        self.frame_count += 1;
        self.total_time += delta;
        self.last_delta = delta;
        delta.as_secs_f32()
    }

    /// Advance by exactly one nominal tick.
    pub fn advance_tick(&mut self) -> f32 {
        self.advance(TICK_DURATION)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    pub fn last_delta(&self) -> Duration {
        self.last_delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_frames_are_clamped() {
        let mut clock = FrameClock::new();
        let delta = clock.advance(Duration::from_secs(3));
        assert_eq!(delta, MAX_FRAME_DELTA.as_secs_f32());
        assert_eq!(clock.total_time(), MAX_FRAME_DELTA);
    }

    #[test]
    fn ticks_accumulate() {
        let mut clock = FrameClock::new();
        clock.advance_tick();
        clock.advance_tick();
        assert_eq!(clock.frame_count(), 2);
        assert_eq!(clock.total_time(), TICK_DURATION * 2);
        assert_eq!(clock.last_delta(), TICK_DURATION);
    }
}
