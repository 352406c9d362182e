//! Trailing-edge debounce on top of `TimerQueue`.
//!
//! Every `push` cancels the pending timer before scheduling a new one, so at
//! most one value commits per quiet window and it is always the latest one.

use std::time::Duration;

use crate::timer::{TimerHandle, TimerQueue};

/// Default quiet window for committing search text.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    timers: TimerQueue<T>,
    pending: Option<TimerHandle>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timers: TimerQueue::new(),
            pending: None,
        }
    }

    /// Record a new value at `now`, superseding any pending one.
    pub fn push(&mut self, now: Duration, value: T) {
        if let Some(handle) = self.pending.take() {
            self.timers.cancel(handle);
        }
        self.pending = Some(self.timers.schedule(now, self.delay, value));
    }

    /// The value to commit, once `delay` has passed since the last `push`.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        let committed = self.timers.expire(now).pop()?;
        self.pending = None;
        Some(committed)
    }

    /// Drop the pending value; nothing commits until the next `push`.
    pub fn teardown(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => self.timers.cancel(handle),
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.map(|handle| handle.deadline())
    }
}
