// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Timing: virtual-time timer queue and debounce primitives.
//!
//! Hosts own the clock. Every operation takes the current time as a plain
//! `u64` millisecond count, so the same code runs under a browser animation
//! frame, a native event loop, or a test that steps time by hand.
//!
//! - [`TimerQueue`] holds deferred payloads ordered by deadline. Each entry is
//!   identified by a [`TimerId`] that can be cancelled before it fires.
//! - [`Debounce`] coalesces bursts of triggers into a single firing once the
//!   burst has been quiet for a fixed period.
//!
//! ## Minimal example
//!
//! ```rust
//! use expanse_timing::{Debounce, TimerQueue};
//!
//! let mut queue = TimerQueue::new();
//! let mut debounce = Debounce::new(400);
//!
//! // Three triggers in quick succession.
//! debounce.trigger(&mut queue, 0, "fetch");
//! debounce.trigger(&mut queue, 100, "fetch");
//! debounce.trigger(&mut queue, 250, "fetch");
//!
//! // Nothing is due until 400 ms after the last trigger.
//! assert!(queue.pop_due(600).is_none());
//! let (id, payload) = queue.pop_due(650).unwrap();
//! assert!(debounce.fire(id));
//! assert_eq!(payload, "fetch");
//! assert!(queue.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod debounce;
mod queue;

pub use debounce::{Debounce, DebounceState};
pub use queue::{TimerId, TimerQueue};
