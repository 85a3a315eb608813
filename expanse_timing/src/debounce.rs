// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounce state machine on top of [`TimerQueue`].
//!
//! A [`Debounce`] is either idle or waiting on exactly one timer. Each
//! [`Debounce::trigger`] cancels the outstanding timer (if any) and schedules
//! a fresh one `quiet_ms` in the future. When the host pops a due timer from
//! the queue it hands the id to [`Debounce::fire`], which reports whether that
//! timer is the live one.

use crate::queue::{TimerId, TimerQueue};

/// Observable state of a [`Debounce`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebounceState {
    /// No timer outstanding.
    Idle,
    /// Waiting for the given timer to fire.
    Pending(TimerId),
}

/// Coalesces bursts of triggers into one firing after a quiet period.
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    quiet_ms: u64,
    state: DebounceState,
}

impl Debounce {
    /// Creates an idle debounce with the given quiet period.
    #[must_use]
    pub const fn new(quiet_ms: u64) -> Self {
        Self {
            quiet_ms,
            state: DebounceState::Idle,
        }
    }

    /// Returns the quiet period in milliseconds.
    #[must_use]
    pub const fn quiet_ms(&self) -> u64 {
        self.quiet_ms
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> DebounceState {
        self.state
    }

    /// Returns `true` while a timer is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending(_))
    }

    /// Restarts the quiet period at `now`.
    ///
    /// Any outstanding timer is cancelled in `queue` before the new one is
    /// scheduled, so at most one timer belonging to this debounce is ever
    /// queued.
    pub fn trigger<T>(&mut self, queue: &mut TimerQueue<T>, now: u64, payload: T) -> TimerId {
        if let DebounceState::Pending(old) = self.state {
            queue.cancel(old);
        }
        let id = queue.schedule(now.saturating_add(self.quiet_ms), payload);
        self.state = DebounceState::Pending(id);
        id
    }

    /// Reports a fired timer.
    ///
    /// Returns `true` and goes idle if `id` is the outstanding timer. Ids of
    /// superseded timers return `false` and leave the state untouched.
    pub fn fire(&mut self, id: TimerId) -> bool {
        match self.state {
            DebounceState::Pending(current) if current == id => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Cancels the outstanding timer, if any.
    pub fn cancel<T>(&mut self, queue: &mut TimerQueue<T>) -> bool {
        match self.state {
            DebounceState::Pending(id) => {
                self.state = DebounceState::Idle;
                queue.cancel(id).is_some()
            }
            DebounceState::Idle => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Debounce, DebounceState};
    use crate::TimerQueue;

    fn run_until(queue: &mut TimerQueue<()>, debounce: &mut Debounce, now: u64) -> usize {
        let mut fired = 0;
        while let Some((id, ())) = queue.pop_due(now) {
            if debounce.fire(id) {
                fired += 1;
            }
        }
        fired
    }

    #[test]
    fn starts_idle() {
        let d = Debounce::new(400);
        assert_eq!(d.state(), DebounceState::Idle);
        assert!(!d.is_pending());
        assert_eq!(d.quiet_ms(), 400);
    }

    #[test]
    fn burst_fires_once_after_last_trigger() {
        let mut q = TimerQueue::new();
        let mut d = Debounce::new(400);

        for t in [0, 50, 120, 300, 390] {
            d.trigger(&mut q, t, ());
        }
        assert_eq!(q.len(), 1);

        assert_eq!(run_until(&mut q, &mut d, 789), 0);
        assert!(d.is_pending());
        assert_eq!(run_until(&mut q, &mut d, 790), 1);
        assert_eq!(d.state(), DebounceState::Idle);
        assert_eq!(run_until(&mut q, &mut d, 10_000), 0);
    }

    #[test]
    fn separated_triggers_fire_separately() {
        let mut q = TimerQueue::new();
        let mut d = Debounce::new(400);

        d.trigger(&mut q, 0, ());
        assert_eq!(run_until(&mut q, &mut d, 400), 1);
        d.trigger(&mut q, 1_000, ());
        assert_eq!(run_until(&mut q, &mut d, 1_400), 1);
    }

    #[test]
    fn stale_id_does_not_fire() {
        let mut q = TimerQueue::new();
        let mut d = Debounce::new(400);

        let old = d.trigger(&mut q, 0, ());
        let new = d.trigger(&mut q, 10, ());
        assert!(!d.fire(old));
        assert!(d.is_pending());
        assert!(d.fire(new));
    }

    #[test]
    fn cancel_goes_idle_and_clears_queue() {
        let mut q = TimerQueue::new();
        let mut d = Debounce::new(400);

        d.trigger(&mut q, 0, ());
        assert!(d.cancel(&mut q));
        assert!(q.is_empty());
        assert!(!d.cancel(&mut q));
        assert_eq!(run_until(&mut q, &mut d, 1_000), 0);
    }
}
