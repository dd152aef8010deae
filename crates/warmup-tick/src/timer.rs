//! The host timer service.
//!
//! Deferred work in the plugin (countdown ticks, grenade regrants,
//! respawns) is never run from its own thread. It is queued against a
//! [`TimerService`] and handed back to the caller on a later frame of the
//! same thread. [`DelayQueue`] is the frame-driven implementation: the
//! host calls [`DelayQueue::advance`] once per frame and runs whatever
//! comes back.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use tracing::trace;

/// Handle to one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T-{}", self.0)
    }
}

/// Something that can run a task of type `T` after a delay.
pub trait TimerService<T> {
    /// Queues `task` to fire `after` from now and returns its handle.
    fn schedule(&mut self, after: Duration, task: T) -> TaskId;

    /// Removes a pending task. Returns `false` if the task already fired,
    /// was already cancelled, or never existed.
    fn cancel(&mut self, id: TaskId) -> bool;

    /// Whether the task is still waiting to fire.
    fn is_pending(&self, id: TaskId) -> bool;
}

/// Frame-driven timer queue.
///
/// Time only moves when [`advance`](Self::advance) is called, so the queue
/// is fully deterministic under test. Tasks due at the same instant fire
/// in the order they were scheduled.
#[derive(Debug)]
pub struct DelayQueue<T> {
    now: Duration,
    next_id: u64,
    /// Pending tasks ordered by (due time, id).
    entries: BTreeMap<(Duration, u64), T>,
    /// Task id → due time, for O(log n) cancellation.
    due: HashMap<u64, Duration>,
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            entries: BTreeMap::new(),
            due: HashMap::new(),
        }
    }
}

impl<T> DelayQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on this queue's clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending tasks in firing order.
    pub fn pending(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Moves the clock forward by `dt` and returns every task now due, in
    /// firing order.
    ///
    /// Tasks scheduled while the caller runs the returned batch (including
    /// zero-delay ones) land in the queue and fire on the next call, never
    /// in the same batch.
    pub fn advance(&mut self, dt: Duration) -> Vec<T> {
        self.now += dt;
        let still_pending = self.entries.split_off(&(self.now, u64::MAX));
        let fired = std::mem::replace(&mut self.entries, still_pending);

        let mut out = Vec::with_capacity(fired.len());
        for ((_, id), task) in fired {
            self.due.remove(&id);
            trace!(task = %TaskId(id), "timer fired");
            out.push(task);
        }
        out
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.due.clear();
    }
}

impl<T> TimerService<T> for DelayQueue<T> {
    fn schedule(&mut self, after: Duration, task: T) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        let at = self.now + after;
        self.entries.insert((at, id), task);
        self.due.insert(id, at);
        trace!(task = %TaskId(id), after_ms = after.as_millis() as u64, "timer scheduled");
        TaskId(id)
    }

    fn cancel(&mut self, id: TaskId) -> bool {
        match self.due.remove(&id.0) {
            Some(at) => self.entries.remove(&(at, id.0)).is_some(),
            None => false,
        }
    }

    fn is_pending(&self, id: TaskId) -> bool {
        self.due.contains_key(&id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_fires_only_due_tasks() {
        let mut q = DelayQueue::new();
        q.schedule(Duration::from_secs(1), "a");
        q.schedule(Duration::from_secs(2), "b");

        assert!(q.advance(Duration::from_millis(999)).is_empty());
        assert_eq!(q.advance(Duration::from_millis(1)), vec!["a"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.advance(Duration::from_secs(5)), vec!["b"]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_same_instant_fires_in_schedule_order() {
        let mut q = DelayQueue::new();
        q.schedule(Duration::from_secs(1), 1);
        q.schedule(Duration::from_secs(1), 2);
        q.schedule(Duration::ZERO, 0);
        assert_eq!(q.advance(Duration::from_secs(1)), vec![0, 1, 2]);
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut q = DelayQueue::new();
        q.schedule(Duration::ZERO, "now");
        assert_eq!(q.advance(Duration::ZERO), vec!["now"]);
    }

    #[test]
    fn test_cancel_pending_and_fired() {
        let mut q = DelayQueue::new();
        let a = q.schedule(Duration::from_secs(1), "a");
        let b = q.schedule(Duration::from_secs(1), "b");

        assert!(q.is_pending(a));
        assert!(q.cancel(a));
        assert!(!q.is_pending(a));
        assert!(!q.cancel(a), "second cancel finds nothing");

        assert_eq!(q.advance(Duration::from_secs(1)), vec!["b"]);
        assert!(!q.cancel(b), "cancel after firing finds nothing");
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut q = DelayQueue::new();
        let id = q.schedule(Duration::from_secs(1), ());
        q.clear();
        assert!(q.is_empty());
        assert!(!q.is_pending(id));
        assert!(q.advance(Duration::from_secs(10)).is_empty());
    }
}
