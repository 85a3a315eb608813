// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named lifecycle checkpoints for external observers.
//!
//! The canvas does not export metrics or traces itself. Instead it reports
//! each checkpoint to registered observers (and as a `trace` event under the
//! `expanse.canvas` target), so a telemetry layer can open and close spans
//! around zooms and fetches without reaching into the canvas.

use std::fmt;

use kurbo::Point;

/// Which request path a fetch checkpoint belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchKind {
    /// The first batch loaded into an empty canvas.
    Initial,
    /// A debounced batch around the current view.
    Batch,
    /// A single widget requested by id.
    Single,
}

/// How a fetch ended.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome {
    /// The backend answered with widgets.
    Succeeded {
        /// Widgets in the response.
        received: usize,
        /// Widgets that were new to the store.
        added: usize,
    },
    /// The backend answered with an error.
    Failed {
        /// Message surfaced in the error slot.
        message: String,
    },
}

/// A named point in the canvas lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum Checkpoint {
    /// Pointer pressed; a pan gesture may follow.
    PanStarted {
        /// Screen position of the press.
        anchor: Point,
    },
    /// Pointer released.
    PanEnded,
    /// A wheel event is about to be applied.
    ZoomStarted {
        /// Screen position of the cursor.
        cursor: Point,
        /// Zoom before the event.
        zoom: f64,
    },
    /// A wheel event was applied.
    ZoomEnded {
        /// Zoom after the event.
        zoom: f64,
        /// `false` if the zoom was already at its limit.
        changed: bool,
    },
    /// The debounce timer was (re)started.
    FetchScheduled {
        /// Time at which it fires if nothing supersedes it.
        due: u64,
    },
    /// A request was issued.
    FetchStarted {
        /// Request path.
        kind: FetchKind,
        /// Issue time.
        at: u64,
    },
    /// A debounced fetch fired while another batch was in flight and was
    /// dropped.
    FetchSkipped {
        /// Time of the dropped fetch.
        at: u64,
    },
    /// A request completed.
    FetchEnded {
        /// Request path.
        kind: FetchKind,
        /// Completion time.
        at: u64,
        /// Result.
        outcome: FetchOutcome,
    },
}

/// Handle returned by [`Canvas::subscribe_checkpoints`](crate::Canvas::subscribe_checkpoints).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&Checkpoint)>;

#[derive(Default)]
pub(crate) struct Observers {
    entries: Vec<(ObserverId, Observer)>,
    next: u64,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Observer) -> ObserverId {
        let id = ObserverId(self.next);
        self.next += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(o, _)| *o != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&mut self, checkpoint: Checkpoint) {
        tracing::trace!(target: "expanse.canvas", checkpoint = ?checkpoint, "checkpoint");
        for (_, observer) in &mut self.entries {
            observer(&checkpoint);
        }
    }
}
