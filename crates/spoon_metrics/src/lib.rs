//! Spoon Metrics - frame and system timing
//!
//! Timing helpers consumed by the ECS world and the runtime loop. With the
//! `metrics` feature disabled every type collapses into a no-op stub that
//! keeps the same API, so call sites never need their own `cfg` guards.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use spoon_metrics::SystemProfiler;
//!
//! let mut profiler = SystemProfiler::new();
//! profiler.time_system("MovementSystem", || step_movement());
//! println!("{:?}", profiler.timing("MovementSystem"));
//! ```

#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod ring_buffer;
#[cfg(feature = "metrics")]
mod system_profiler;

#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;
#[cfg(feature = "metrics")]
pub use system_profiler::SystemProfiler;

#[cfg(not(feature = "metrics"))]
use std::time::Duration;

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) -> Duration { Duration::ZERO }
    pub fn frames(&self) -> u64 { 0 }
    pub fn fps(&self) -> f64 { 0.0 }
    pub fn frame_time_ms(&self) -> f64 { 0.0 }
    pub fn frame_time_range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
}

#[cfg(not(feature = "metrics"))]
pub struct RingBuffer;

#[cfg(not(feature = "metrics"))]
impl RingBuffer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn push(&mut self, _sample: Duration) {}
    pub fn len(&self) -> usize { 0 }
    pub fn is_empty(&self) -> bool { true }
    pub fn latest(&self) -> Option<Duration> { None }
    pub fn average(&self) -> Duration { Duration::ZERO }
    pub fn min_max(&self) -> (Duration, Duration) { (Duration::ZERO, Duration::ZERO) }
}

#[cfg(not(feature = "metrics"))]
#[derive(Default)]
pub struct SystemProfiler;

#[cfg(not(feature = "metrics"))]
impl SystemProfiler {
    pub fn new() -> Self { Self }
    pub fn time_system<F, R>(&mut self, _name: &str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn timing(&self, _name: &str) -> Duration { Duration::ZERO }
    pub fn calls(&self, _name: &str) -> u64 { 0 }
    pub fn reset(&mut self) {}
    pub fn iter(&self) -> impl Iterator<Item = (&str, Duration)> { std::iter::empty() }
}
