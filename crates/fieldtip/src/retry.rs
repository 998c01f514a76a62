// SPDX-License-Identifier: MIT
//! Attachment retry scheduling.
//!
//! One explicit scheduler keyed by [`RetryState`] drives the anchor
//! resolver: an escalating delay ladder started at init, a debounced
//! mutation-triggered retry bounded by an observation window, and one
//! deferred retry per host re-render. Cancellation and idempotence live in
//! the component's single timer set; there are no nested ad hoc timers.
//!
//! Failed attempts are never surfaced to the host; they are logged and
//! retried until the budget runs out, at which point the component
//! synthesizes a fixed-position fallback icon and resolves in degraded
//! mode.

#![forbid(unsafe_code)]

use web_time::{Duration, Instant};

/// Delay ladder for the timed attempts, in milliseconds. After the ladder
/// is exhausted the last rung repeats until the attempt budget is spent,
/// so exhaustion (and with it the fallback) is reached even on a page that
/// never mutates.
const LADDER_MS: [u64; 5] = [100, 300, 800, 1500, 3000];

/// Debounce window for mutation-triggered retries.
pub const MUTATION_DEBOUNCE: Duration = Duration::from_millis(200);

/// How long after mount the mutation subscription stays alive.
pub const OBSERVE_WINDOW: Duration = Duration::from_secs(15);

/// Deferral for the per-re-render retry.
pub const UPDATE_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Total attempt budget.
pub const MAX_ATTEMPTS: u32 = 6;

/// Progress of the attachment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub attempts: u32,
    pub max_attempts: u32,
    pub resolved: bool,
}

/// The scheduler: retry state plus ladder position and the mutation
/// observation deadline.
#[derive(Debug, Clone)]
pub struct RetrySchedule {
    state: RetryState,
    rung: usize,
    observe_until: Instant,
}

impl RetrySchedule {
    pub fn new(now: Instant) -> Self {
        Self {
            state: RetryState {
                attempts: 0,
                max_attempts: MAX_ATTEMPTS,
                resolved: false,
            },
            rung: 0,
            observe_until: now + OBSERVE_WINDOW,
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    pub fn resolved(&self) -> bool {
        self.state.resolved
    }

    /// Attempt budget spent without a resolution.
    pub fn exhausted(&self) -> bool {
        !self.state.resolved && self.state.attempts >= self.state.max_attempts
    }

    /// Claim one attempt. Returns `false` when the session is already
    /// resolved or the budget is spent, in which case the caller must
    /// not resolve.
    pub fn begin_attempt(&mut self) -> bool {
        if self.state.resolved || self.state.attempts >= self.state.max_attempts {
            return false;
        }
        self.state.attempts += 1;
        true
    }

    /// Mark the session resolved. Monotonic until [`Self::reset`].
    pub fn mark_resolved(&mut self) {
        self.state.resolved = true;
    }

    /// Delay until the next timed attempt, advancing the ladder. `None`
    /// once the session is resolved or out of budget.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.state.resolved || self.state.attempts >= self.state.max_attempts {
            return None;
        }
        let ms = LADDER_MS[self.rung.min(LADDER_MS.len() - 1)];
        self.rung += 1;
        Some(Duration::from_millis(ms))
    }

    /// Whether mutation notifications are still honored at `now`.
    pub fn observing(&self, now: Instant) -> bool {
        !self.state.resolved && now <= self.observe_until
    }

    /// Restart the session (explicit hide/show cycle). This is the only
    /// way `resolved` reverts.
    pub fn reset(&mut self, now: Instant) {
        *self = Self::new(now);
    }
}
