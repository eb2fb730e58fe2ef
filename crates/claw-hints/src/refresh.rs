#![forbid(unsafe_code)]

//! Refresh scheduling.
//!
//! Scroll, wheel and click notifications arrive in bursts. The
//! [`RefreshScheduler`] folds a burst into one relabel pass using a
//! "last call wins" rule: scheduling while a refresh is pending cancels the
//! pending one and restarts the wait with the new delay.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐  schedule(c, now)   ┌────────────────────────────┐
//! │ Idle │────────────────────▶│ Pending { deadline, class } │◀─┐
//! └──────┘                     └────────────────────────────┘  │
//!    ▲                           │            │ schedule(c', now')
//!    │      poll(now >= deadline)│            └─────────────────┘
//!    └───────────────────────────┘   (cancel + restart)
//! ```
//!
//! Time is host-driven: callers pass a monotonic `now` and poll when their
//! clock advances. Nothing here sleeps.
//!
//! Activation settle timers are separate ([`SettleTimers`]): each activation
//! arms its own timer, none cancels another. Timers sharing a deadline are
//! merged, since they would relabel the same geometry at the same instant.

use std::collections::BTreeSet;
use std::time::Duration;

/// How long a refresh waits, relative to the configured timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshClass {
    /// No delay.
    Immediate,
    /// Half the timeout (scroll, wheel).
    Half,
    /// The full timeout (click).
    Full,
}

impl RefreshClass {
    /// Delay for this class under `timeout`.
    #[must_use]
    pub fn delay(self, timeout: Duration) -> Duration {
        match self {
            Self::Immediate => Duration::ZERO,
            Self::Half => timeout / 2,
            Self::Full => timeout,
        }
    }
}

/// Debounce timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    /// No refresh pending.
    #[default]
    Idle,
    /// One refresh pending.
    Pending {
        /// When it fires.
        deadline: Duration,
        /// Class it was scheduled with.
        class: RefreshClass,
    },
}

/// Single-slot debounce timer with cancel-and-reschedule semantics.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    timeout: Duration,
    state: TimerState,
    /// Diagnostic: pending refreshes replaced before firing.
    coalesced: u64,
}

impl RefreshScheduler {
    /// Create an idle scheduler for the given Full-class timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            state: TimerState::Idle,
            coalesced: 0,
        }
    }

    /// Schedule a refresh of `class`, replacing any pending one.
    ///
    /// Returns the deadline of the refresh that was cancelled, if any.
    pub fn schedule(&mut self, class: RefreshClass, now: Duration) -> Option<Duration> {
        let cancelled = self.deadline();
        if cancelled.is_some() {
            self.coalesced += 1;
        }
        let deadline = now.saturating_add(class.delay(self.timeout));
        self.state = TimerState::Pending { deadline, class };
        tracing::trace!(
            ?class,
            deadline_ms = deadline.as_millis() as u64,
            replaced = cancelled.is_some(),
            "refresh scheduled"
        );
        cancelled
    }

    /// Fire the pending refresh if its deadline has passed.
    ///
    /// Returns `true` exactly once per scheduled refresh.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.state {
            TimerState::Pending { deadline, class } if now >= deadline => {
                self.state = TimerState::Idle;
                tracing::trace!(?class, "refresh fired");
                true
            }
            _ => false,
        }
    }

    /// Drop any pending refresh without firing it.
    pub fn cancel(&mut self) {
        self.state = TimerState::Idle;
    }

    /// Current timer state.
    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    /// Deadline of the pending refresh.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        match self.state {
            TimerState::Pending { deadline, .. } => Some(deadline),
            TimerState::Idle => None,
        }
    }

    /// Whether a refresh is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.state, TimerState::Pending { .. })
    }

    /// Number of pending refreshes that were replaced before firing.
    #[must_use]
    pub const fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Full-class timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Independent one-shot timers armed after activations.
///
/// Timers are only retired by [`SettleTimers::take_due`]. A host that never
/// polls keeps one entry per distinct deadline; activations arriving at the
/// same instant share an entry.
#[derive(Debug, Clone, Default)]
pub struct SettleTimers {
    deadlines: BTreeSet<Duration>,
}

impl SettleTimers {
    /// Arm a timer firing at `deadline`. Returns `false` when a timer at
    /// that deadline was already armed.
    pub fn arm(&mut self, deadline: Duration) -> bool {
        self.deadlines.insert(deadline)
    }

    /// Remove and count every timer due at `now`.
    pub fn take_due(&mut self, now: Duration) -> usize {
        let before = self.deadlines.len();
        self.deadlines.retain(|deadline| *deadline > now);
        before - self.deadlines.len()
    }

    /// Earliest armed deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadlines.first().copied()
    }

    /// Number of armed timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Whether no timer is armed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn class_delays() {
        assert_eq!(RefreshClass::Immediate.delay(ms(500)), Duration::ZERO);
        assert_eq!(RefreshClass::Half.delay(ms(500)), ms(250));
        assert_eq!(RefreshClass::Full.delay(ms(500)), ms(500));
    }

    #[test]
    fn new_scheduler_is_idle() {
        let scheduler = RefreshScheduler::new(ms(500));
        assert_eq!(scheduler.state(), TimerState::Idle);
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.deadline(), None);
    }

    #[test]
    fn fires_once_at_deadline() {
        let mut scheduler = RefreshScheduler::new(ms(500));
        assert_eq!(scheduler.schedule(RefreshClass::Half, ms(1000)), None);
        assert!(!scheduler.poll(ms(1249)));
        assert!(scheduler.poll(ms(1250)));
        assert!(!scheduler.poll(ms(1250)));
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn last_call_wins() {
        let mut scheduler = RefreshScheduler::new(ms(500));
        scheduler.schedule(RefreshClass::Half, ms(0));
        let cancelled = scheduler.schedule(RefreshClass::Full, ms(100));
        assert_eq!(cancelled, Some(ms(250)));
        assert_eq!(
            scheduler.state(),
            TimerState::Pending {
                deadline: ms(600),
                class: RefreshClass::Full
            }
        );
        // The Half deadline passes without firing.
        assert!(!scheduler.poll(ms(250)));
        assert!(!scheduler.poll(ms(599)));
        assert!(scheduler.poll(ms(600)));
        assert_eq!(scheduler.coalesced(), 1);
    }

    #[test]
    fn shorter_delay_can_replace_longer() {
        let mut scheduler = RefreshScheduler::new(ms(500));
        scheduler.schedule(RefreshClass::Full, ms(0));
        scheduler.schedule(RefreshClass::Half, ms(10));
        assert_eq!(scheduler.deadline(), Some(ms(260)));
    }

    #[test]
    fn immediate_fires_on_next_poll() {
        let mut scheduler = RefreshScheduler::new(ms(500));
        scheduler.schedule(RefreshClass::Immediate, ms(42));
        assert!(scheduler.poll(ms(42)));
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut scheduler = RefreshScheduler::new(ms(500));
        scheduler.schedule(RefreshClass::Full, ms(0));
        scheduler.cancel();
        assert!(!scheduler.poll(ms(10_000)));
    }

    #[test]
    fn settle_timers_are_independent() {
        let mut timers = SettleTimers::default();
        timers.arm(ms(500));
        timers.arm(ms(700));
        assert_eq!(timers.len(), 2);
        assert_eq!(timers.next_deadline(), Some(ms(500)));
        assert_eq!(timers.take_due(ms(499)), 0);
        assert_eq!(timers.take_due(ms(600)), 1);
        assert_eq!(timers.next_deadline(), Some(ms(700)));
        assert_eq!(timers.take_due(ms(800)), 1);
        assert!(timers.is_empty());
    }

    #[test]
    fn settle_timers_merge_equal_deadlines() {
        let mut timers = SettleTimers::default();
        assert!(timers.arm(ms(500)));
        for _ in 0..1_000 {
            assert!(!timers.arm(ms(500)));
        }
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.take_due(ms(500)), 1);
        assert!(timers.is_empty());
    }
}
