//! Debounce and auto-refresh timers driven by the caller's clock.
//!
//! Neither timer owns an OS thread or callback. The owning page polls them with
//! the current `Instant` on every tick, so a timer can never fire after the
//! page state that holds it has been dropped.

use std::time::{Duration, Instant};

/// Search-as-you-type debounce delay.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(250);

/// Auto-refresh interval (five minutes).
pub const AUTO_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Fires once, `delay` after the most recent `schedule`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Cancel any pending deadline and start a fresh one.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_DELAY)
    }
}

/// Fixed-interval timer with at most one pending tick.
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    next: Option<Instant>,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    /// Toggle. The existing timer is always cancelled before a new one starts.
    pub fn set_enabled(&mut self, enabled: bool, now: Instant) {
        self.next = None;
        if enabled {
            self.next = Some(now + self.interval);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.next.is_some()
    }

    /// Number of live timers: zero or one.
    pub fn active_timers(&self) -> usize {
        usize::from(self.next.is_some())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fire when due and re-arm one interval from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now >= next => {
                self.next = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(AUTO_REFRESH_INTERVAL)
    }
}
