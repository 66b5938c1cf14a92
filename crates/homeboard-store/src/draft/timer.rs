//! Cancellable trailing-debounce timer.

use chrono::{DateTime, TimeDelta, Utc};

/// A single pending deadline that restarts on every schedule.
///
/// The timer does not run anything by itself. Its owner polls it with the
/// current time and performs the delayed work when [`DebounceTimer::fire`]
/// reports the deadline passed, which keeps the side effect on the owner's
/// call stack and makes cancellation a plain state change.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    /// How long input must pause before the timer fires.
    quiet: TimeDelta,

    /// When the pending work becomes due.
    deadline: Option<DateTime<Utc>>,
}

impl DebounceTimer {
    /// Create an idle timer.
    pub fn new(quiet: TimeDelta) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    #[inline]
    pub fn quiet_period(&self) -> TimeDelta {
        self.quiet
    }

    /// Whether work is waiting to fire.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[inline]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// (Re)start the quiet period from `now`.
    pub fn schedule(&mut self, now: DateTime<Utc>) {
        self.deadline = Some(
            now.checked_add_signed(self.quiet)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        );
    }

    /// Drop the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Time left until the deadline, `None` when idle.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.deadline
            .map(|deadline| (deadline - now).max(TimeDelta::zero()))
    }

    /// Consume the deadline if it has passed. Returns whether it fired.
    pub fn fire(&mut self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
