// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

/// Handle to a scheduled timer.
///
/// Ids are never reused within a queue, so a stale handle can never cancel a
/// newer timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Entry<T> {
    deadline: u64,
    id: TimerId,
    payload: T,
}

/// Deadline-ordered queue of deferred payloads.
///
/// Entries are kept sorted by `(deadline, id)`, so timers sharing a deadline
/// fire in the order they were scheduled.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedules `payload` to become due at `deadline` (milliseconds).
    pub fn schedule(&mut self, deadline: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // Ids grow monotonically, so inserting after every entry with
        // `deadline <= new deadline` keeps `(deadline, id)` order.
        let at = self.entries.partition_point(|e| e.deadline <= deadline);
        self.entries.insert(
            at,
            Entry {
                deadline,
                id,
                payload,
            },
        );
        id
    }

    /// Cancels a scheduled timer, returning its payload.
    ///
    /// Returns `None` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index).payload)
    }

    /// Returns `true` if `id` is still waiting to fire.
    #[must_use]
    pub fn contains(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Returns the earliest deadline in the queue.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.first().map(|e| e.deadline)
    }

    /// Removes and returns the earliest timer whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerId, T)> {
        match self.entries.first() {
            Some(first) if first.deadline <= now => {
                let entry = self.entries.remove(0);
                Some((entry.id, entry.payload))
            }
            _ => None,
        }
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
