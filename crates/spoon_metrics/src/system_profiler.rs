//! Accumulated per-system timings, kept in first-seen order so reports line
//! up with system registration order.

use std::time::{Duration, Instant};

struct SystemTiming {
    name: String,
    total: Duration,
    calls: u64,
}

pub struct SystemProfiler {
    timings: Vec<SystemTiming>,
}

impl SystemProfiler {
    pub fn new() -> Self {
        Self {
            timings: Vec::new(),
        }
    }

    pub fn time_system<F, R>(&mut self, name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        match self.timings.iter_mut().find(|t| t.name == name) {
            Some(timing) => {
                timing.total += elapsed;
                timing.calls += 1;
            }
            None => self.timings.push(SystemTiming {
                name: name.to_string(),
                total: elapsed,
                calls: 1,
            }),
        }
        result
    }

    pub fn timing(&self, name: &str) -> Duration {
        self.find(name).map_or(Duration::ZERO, |t| t.total)
    }

    pub fn calls(&self, name: &str) -> u64 {
        self.find(name).map_or(0, |t| t.calls)
    }

    pub fn reset(&mut self) {
        self.timings.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Duration)> {
        self.timings.iter().map(|t| (t.name.as_str(), t.total))
    }

    fn find(&self, name: &str) -> Option<&SystemTiming> {
        self.timings.iter().find(|t| t.name == name)
    }
}

impl Default for SystemProfiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_first_seen_order() {
        let mut profiler = SystemProfiler::new();
        profiler.time_system("Render", || ());
        profiler.time_system("Movement", || ());
        profiler.time_system("Render", || ());

        let names: Vec<&str> = profiler.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Render", "Movement"]);
        assert_eq!(profiler.calls("Render"), 2);
        assert_eq!(profiler.calls("Movement"), 1);
        assert_eq!(profiler.calls("Camera"), 0);

        profiler.reset();
        assert_eq!(profiler.iter().count(), 0);
    }
}
