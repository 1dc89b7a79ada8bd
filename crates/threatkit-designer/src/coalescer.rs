//! Input coalescing for property edits.
//!
//! A [`Coalescer`] holds at most one pending `(key, value)` with a
//! deadline. Scheduling again for the same key merges the values and
//! restarts the deadline; scheduling for a different key hands the old
//! entry back so the caller can apply it at once. Nothing here runs a
//! timer: the owner polls [`Coalescer::take_due`] with the current instant,
//! which lets tests drive it with a manual clock.

use std::time::{Duration, Instant};

use crate::model::{properties, PropertyBag};

/// Values that can absorb a newer value for the same key.
pub trait Coalesce {
    fn coalesce(&mut self, newer: Self);
}

impl Coalesce for PropertyBag {
    fn coalesce(&mut self, newer: Self) {
        properties::merge_patch(self, newer);
    }
}

#[derive(Debug, Clone)]
struct Pending<K, V> {
    key: K,
    value: V,
    deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct Coalescer<K, V> {
    delay: Duration,
    pending: Option<Pending<K, V>>,
}

impl<K: PartialEq, V: Coalesce> Coalescer<K, V> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_key(&self) -> Option<&K> {
        self.pending.as_ref().map(|p| &p.key)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Queues `value` for `key`, due `delay` after `now`.
    ///
    /// Returns a displaced entry for a different key, which is due
    /// immediately.
    pub fn schedule(&mut self, key: K, value: V, now: Instant) -> Option<(K, V)> {
        let deadline = now + self.delay;
        match self.pending.take() {
            Some(mut pending) if pending.key == key => {
                pending.value.coalesce(value);
                pending.deadline = deadline;
                self.pending = Some(pending);
                None
            }
            displaced => {
                self.pending = Some(Pending {
                    key,
                    value,
                    deadline,
                });
                displaced.map(|p| (p.key, p.value))
            }
        }
    }

    /// Takes the pending entry if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<(K, V)> {
        if self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
            self.flush()
        } else {
            None
        }
    }

    /// Takes the pending entry regardless of its deadline.
    pub fn flush(&mut self) -> Option<(K, V)> {
        self.pending.take().map(|p| (p.key, p.value))
    }

    /// Drops the pending entry without applying it.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Drops the pending entry only if it belongs to `key`.
    pub fn cancel_key(&mut self, key: &K) -> bool {
        if self.pending_key() == Some(key) {
            self.cancel()
        } else {
            false
        }
    }
}
