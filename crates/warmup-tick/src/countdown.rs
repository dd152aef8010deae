//! The countdown scheduler: owner of the single live countdown handle.

use std::time::Duration;

use tracing::debug;

use crate::{TaskId, TimerService};

/// Result of [`Countdown::cancel`]. Every variant counts as success;
/// callers only look at it for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// A pending task was removed before it fired.
    Cancelled,
    /// The held task had already fired (or been dropped by the timer
    /// service).
    AlreadyFired,
    /// No task was held.
    NoneScheduled,
}

/// Holds at most one live scheduled task.
///
/// `schedule` replaces whatever was held, cancelling it first if it is
/// still pending, so the held handle is always the most recent one.
#[derive(Debug, Default)]
pub struct Countdown {
    handle: Option<TaskId>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` after `after`, replacing any held handle.
    pub fn schedule<T, S>(&mut self, timers: &mut S, after: Duration, task: T) -> TaskId
    where
        S: TimerService<T> + ?Sized,
    {
        if let Some(prev) = self.handle.take() {
            if timers.cancel(prev) {
                debug!(task = %prev, "replaced pending countdown task");
            }
        }
        let id = timers.schedule(after, task);
        self.handle = Some(id);
        id
    }

    /// Best-effort cancellation of the held task. Never fails.
    pub fn cancel<T, S>(&mut self, timers: &mut S) -> CancelOutcome
    where
        S: TimerService<T> + ?Sized,
    {
        match self.handle.take() {
            None => CancelOutcome::NoneScheduled,
            Some(id) if timers.cancel(id) => CancelOutcome::Cancelled,
            Some(_) => CancelOutcome::AlreadyFired,
        }
    }

    /// The held handle, if any. It may already have fired.
    pub fn handle(&self) -> Option<TaskId> {
        self.handle
    }

    /// Whether the held task is still waiting to fire.
    pub fn is_live<T, S>(&self, timers: &S) -> bool
    where
        S: TimerService<T> + ?Sized,
    {
        self.handle.is_some_and(|id| timers.is_pending(id))
    }
}
