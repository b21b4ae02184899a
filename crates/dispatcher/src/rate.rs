//! Reset-on-activity send throttle.
//!
//! Every `send()` moves the window origin to "now", whether or not it was
//! admitted. Arrivals closer than `window` to the previous arrival increment
//! the counter; a larger gap resets it. Once the counter exceeds `limit` the
//! send is dropped.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RateWindow {
    window: Duration,
    limit: u32,
    window_start: Option<Instant>,
    count: u32,
}

impl RateWindow {
    pub fn new(window: Duration, limit: u32) -> Self {
        Self {
            window,
            limit,
            window_start: None,
            count: 0,
        }
    }

    /// Records an arrival at `now` and reports whether it may be sent.
    pub fn admit(&mut self, now: Instant) -> bool {
        let within = self
            .window_start
            .is_some_and(|start| now.saturating_duration_since(start) < self.window);
        self.count = if within { self.count.saturating_add(1) } else { 0 };
        self.window_start = Some(now);
        self.count <= self.limit
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
#[path = "tests/rate_tests.rs"]
mod tests;
