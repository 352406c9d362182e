//! Host-driven cancellable timers.
//!
//! # Design
//! The core never reads a clock. Callers pass `now` as a `Duration` measured
//! from any fixed origin (page load, process start, a test's zero) and call
//! `expire` when they want due timers delivered. Each timer carries a payload
//! instead of a closure, so firing a timer is just handing the payload back
//! to whoever owns the state it should mutate.

use std::collections::BTreeMap;
use std::time::Duration;

/// Identifies a scheduled timer. Cancelling a stale handle is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle {
    deadline: Duration,
    seq: u64,
}

impl TimerHandle {
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

/// Timers ordered by deadline, then by scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_seq: u64,
    entries: BTreeMap<(Duration, u64), T>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            entries: BTreeMap::new(),
        }
    }

    pub fn schedule(&mut self, now: Duration, delay: Duration, payload: T) -> TimerHandle {
        let handle = TimerHandle {
            deadline: now.saturating_add(delay),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.entries.insert((handle.deadline, handle.seq), payload);
        handle
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.entries.remove(&(handle.deadline, handle.seq)).is_some()
    }

    /// Remove and return every payload whose deadline is `<= now`.
    pub fn expire(&mut self, now: Duration) -> Vec<T> {
        let pending = self.entries.split_off(&(now, u64::MAX));
        let due = std::mem::replace(&mut self.entries, pending);
        due.into_values().collect()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
