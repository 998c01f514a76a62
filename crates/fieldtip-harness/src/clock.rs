#![forbid(unsafe_code)]

//! Hand-stepped clock for deterministic timer tests.

use web_time::{Duration, Instant};

/// Millisecond shorthand.
#[must_use]
pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// A clock that only moves when the test says so.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    now: Instant,
}

impl Clock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
        }
    }

    #[must_use]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Advance by `millis` and return the new time.
    pub fn advance(&mut self, millis: u64) -> Instant {
        self.now += ms(millis);
        self.now
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ms};

    #[test]
    fn advance_is_cumulative() {
        let mut clock = Clock::new();
        let start = clock.now();
        clock.advance(100);
        clock.advance(50);
        assert_eq!(clock.now() - start, ms(150));
    }
}
