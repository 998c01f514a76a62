#![forbid(unsafe_code)]

//! Cancelable one-shot timer set.
//!
//! Every "wait" in the component is a scheduled callback, never a busy
//! loop. The host drives [`Timers::due`] from its own tick; the component
//! never reads a clock. Scheduling a kind that is already pending
//! supersedes the earlier deadline, which is exactly the debounce behavior
//! the mutation observer needs.

use web_time::Instant;

/// The distinct scheduled callbacks the component uses.
///
/// One slot per kind: a newer schedule of the same kind replaces the older
/// one, and cancellation is by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Debounced show transition (`showDelay`).
    Show,
    /// Debounced hide transition (`hideDelay`).
    Hide,
    /// Optional forced hide armed at show time.
    AutoHide,
    /// Next anchor-attachment attempt on the escalating ladder.
    Retry,
    /// Debounced attachment attempt after a host DOM mutation.
    MutationDebounce,
}

impl TimerKind {
    const ALL: [TimerKind; 5] = [
        TimerKind::Show,
        TimerKind::Hide,
        TimerKind::AutoHide,
        TimerKind::Retry,
        TimerKind::MutationDebounce,
    ];

    const fn index(self) -> usize {
        match self {
            TimerKind::Show => 0,
            TimerKind::Hide => 1,
            TimerKind::AutoHide => 2,
            TimerKind::Retry => 3,
            TimerKind::MutationDebounce => 4,
        }
    }
}

/// One-shot deadlines keyed by [`TimerKind`].
#[derive(Debug, Default)]
pub struct Timers {
    slots: [Option<Instant>; 5],
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `kind` to fire at `at`, superseding any pending deadline of the
    /// same kind.
    pub fn schedule(&mut self, kind: TimerKind, at: Instant) {
        self.slots[kind.index()] = Some(at);
    }

    /// Disarm `kind`. Canceling an idle timer is a no-op.
    pub fn cancel(&mut self, kind: TimerKind) {
        self.slots[kind.index()] = None;
    }

    /// Disarm everything. Used on teardown.
    pub fn clear(&mut self) {
        self.slots = [None; 5];
    }

    pub fn is_scheduled(&self, kind: TimerKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Earliest pending deadline, if any. Lets the host sleep precisely.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots.iter().flatten().min().copied()
    }

    /// Pop every timer whose deadline has passed, ordered by deadline.
    ///
    /// Expired timers are disarmed before being returned, so a callback
    /// rescheduling its own kind starts a fresh deadline.
    pub fn due(&mut self, now: Instant) -> Vec<TimerKind> {
        let mut fired: Vec<(Instant, TimerKind)> = Vec::new();
        for kind in TimerKind::ALL {
            if let Some(at) = self.slots[kind.index()]
                && at <= now
            {
                self.slots[kind.index()] = None;
                fired.push((at, kind));
            }
        }
        fired.sort_by_key(|(at, kind)| (*at, kind.index()));
        fired.into_iter().map(|(_, kind)| kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{TimerKind, Timers};
    use web_time::{Duration, Instant};

    #[test]
    fn schedule_supersedes_same_kind() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(TimerKind::Show, t0 + Duration::from_millis(300));
        timers.schedule(TimerKind::Show, t0 + Duration::from_millis(50));
        assert!(timers.due(t0 + Duration::from_millis(100)).contains(&TimerKind::Show));
        // The superseded 300 ms deadline must not fire later.
        assert!(timers.due(t0 + Duration::from_millis(400)).is_empty());
    }

    #[test]
    fn cancel_disarms() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(TimerKind::Hide, t0 + Duration::from_millis(100));
        timers.cancel(TimerKind::Hide);
        assert!(!timers.is_scheduled(TimerKind::Hide));
        assert!(timers.due(t0 + Duration::from_millis(200)).is_empty());
    }

    #[test]
    fn due_orders_by_deadline() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(TimerKind::Retry, t0 + Duration::from_millis(10));
        timers.schedule(TimerKind::Show, t0 + Duration::from_millis(20));
        let fired = timers.due(t0 + Duration::from_millis(30));
        assert_eq!(fired, vec![TimerKind::Retry, TimerKind::Show]);
    }

    #[test]
    fn due_leaves_future_deadlines_armed() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(TimerKind::Retry, t0 + Duration::from_millis(10));
        timers.schedule(TimerKind::AutoHide, t0 + Duration::from_millis(500));
        assert_eq!(timers.due(t0 + Duration::from_millis(10)), vec![TimerKind::Retry]);
        assert_eq!(timers.next_deadline(), Some(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn clear_releases_everything() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(TimerKind::Show, t0);
        timers.schedule(TimerKind::MutationDebounce, t0);
        timers.clear();
        assert_eq!(timers.next_deadline(), None);
    }
}
