// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;
use std::task::Poll;

use expanse_event_state::drag::PanDrag;
use expanse_mock_net::{
    BatchRequest, ErrorProbability, FetchError, MockNetwork, Pending, WidgetBackend,
};
use expanse_store::{ListenerId, StoreChange, Widget, WidgetStore};
use expanse_timing::{Debounce, TimerQueue};
use expanse_view2d::{Cull, Transform, Viewport, ZoomDirection};
use kurbo::{Affine, Point, Size};
use smallvec::SmallVec;

use crate::checkpoint::{Checkpoint, FetchKind, FetchOutcome, ObserverId, Observers};
use crate::config::CanvasConfig;
use crate::render::RenderItem;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CanvasTimer {
    Fetch,
}

#[derive(Debug)]
struct InFlightBatch {
    kind: FetchKind,
    pending: Pending<Vec<Widget>>,
}

#[derive(Debug)]
struct InFlightWidget {
    id: String,
    pending: Pending<Widget>,
}

/// Headless controller of an infinite canvas.
///
/// Input flows one way: pointer and wheel events update the [`Viewport`],
/// every effective change restarts a debounce timer, an expired timer asks the
/// backend for a batch around the view center, and arriving batches are merged
/// into the [`WidgetStore`]. Rendering reads the store through
/// [`Canvas::render_items`], which tags each widget with its culling result.
///
/// The host drives time: every event carries `now` in milliseconds, and
/// [`Canvas::advance`] fires due timers and delivers completed requests.
/// Only one batch is in flight at a time; a debounced fetch that fires while
/// one is loading is dropped, not queued.
#[derive(Debug)]
pub struct Canvas<B> {
    config: CanvasConfig,
    viewport: Viewport,
    cull: Cull,
    drag: PanDrag,
    timers: TimerQueue<CanvasTimer>,
    debounce: Debounce,
    backend: B,
    store: WidgetStore,
    batch: Option<InFlightBatch>,
    singles: SmallVec<[InFlightWidget; 4]>,
    error: Option<String>,
    observers: Observers,
}

impl<B: WidgetBackend> Canvas<B> {
    /// Creates a canvas of `view_size` pixels that fetches from `backend`.
    pub fn new(backend: B, view_size: Size, config: CanvasConfig) -> Self {
        let mut viewport = Viewport::new(view_size);
        viewport.set_zoom_limits(config.min_zoom, config.max_zoom);
        viewport.set_zoom_step(config.zoom_step);
        let cull = Cull {
            footprint: Size::new(config.widget_width, config.widget_height),
            margin_px: config.cull_margin_px,
        };
        Self {
            debounce: Debounce::new(config.debounce_ms),
            config,
            viewport,
            cull,
            drag: PanDrag::default(),
            timers: TimerQueue::new(),
            backend,
            store: WidgetStore::new(),
            batch: None,
            singles: SmallVec::new(),
            error: None,
            observers: Observers::default(),
        }
    }

    // --- input boundary ---

    /// Pointer pressed at `pos` (screen coordinates).
    pub fn pointer_down(&mut self, pos: Point) {
        self.drag.press(pos);
        self.observers.emit(Checkpoint::PanStarted { anchor: pos });
    }

    /// Pointer moved to `pos`. Pans while a press is active.
    ///
    /// Returns `true` if the transform changed.
    pub fn pointer_move(&mut self, pos: Point, now: u64) -> bool {
        let Some(delta) = self.drag.move_to(pos) else {
            return false;
        };
        if !self.viewport.pan_by_screen_delta(delta) {
            return false;
        }
        self.schedule_fetch(now);
        true
    }

    /// Pointer released (or left the canvas).
    pub fn pointer_up(&mut self) {
        if self.drag.release() {
            self.observers.emit(Checkpoint::PanEnded);
        }
    }

    /// Wheel event over `cursor` with vertical delta `delta_y`.
    ///
    /// Returns `true` if the zoom changed. A wheel push against a zoom limit
    /// changes nothing and schedules no fetch.
    pub fn wheel(&mut self, cursor: Point, delta_y: f64, now: u64) -> bool {
        let Some(direction) = ZoomDirection::from_wheel_delta(delta_y) else {
            return false;
        };
        self.observers.emit(Checkpoint::ZoomStarted {
            cursor,
            zoom: self.viewport.zoom(),
        });
        let changed = self.viewport.zoom_at(cursor, direction);
        if changed {
            self.schedule_fetch(now);
        }
        self.observers.emit(Checkpoint::ZoomEnded {
            zoom: self.viewport.zoom(),
            changed,
        });
        changed
    }

    /// Viewport resized to `size` pixels.
    pub fn resize(&mut self, size: Size, now: u64) -> bool {
        if !self.viewport.set_view_size(size) {
            return false;
        }
        self.schedule_fetch(now);
        true
    }

    // --- time ---

    /// Processes everything due at or before `now`, in time order.
    ///
    /// Debounce expiries start fetches; completed requests are applied to the
    /// store or surface their error.
    pub fn advance(&mut self, now: u64) {
        // Channelled completions carry no deadline; take what has arrived.
        if self.batch.as_ref().is_some_and(|b| b.pending.ready_at().is_none()) {
            self.poll_batch(now);
        }
        let mut i = 0;
        while i < self.singles.len() {
            if self.singles[i].pending.ready_at().is_some() || !self.poll_single(i, now) {
                i += 1;
            }
        }

        // Completions win ties with the debounce, batch before singles,
        // singles in issue order.
        loop {
            let timer = self.timers.next_deadline();
            let batch = self.batch.as_ref().and_then(|b| b.pending.ready_at());
            let single = self
                .singles
                .iter()
                .enumerate()
                .filter_map(|(i, s)| s.pending.ready_at().map(|t| (t, i)))
                .min();
            let Some(at) = [timer, batch, single.map(|(t, _)| t)]
                .into_iter()
                .flatten()
                .min()
                .filter(|&t| t <= now)
            else {
                break;
            };
            if batch == Some(at) {
                self.poll_batch(at);
            } else if let Some((_, i)) = single.filter(|&(t, _)| t == at) {
                self.poll_single(i, at);
            } else {
                self.fire_timer(at);
            }
        }
    }

    /// Earliest time at which [`Canvas::advance`] has work to do, if known.
    #[must_use]
    pub fn next_wakeup(&self) -> Option<u64> {
        let batch = self.batch.as_ref().and_then(|b| b.pending.ready_at());
        let singles = self.singles.iter().filter_map(|s| s.pending.ready_at());
        self.timers
            .next_deadline()
            .into_iter()
            .chain(batch)
            .chain(singles)
            .min()
    }

    // --- fetching ---

    /// Loads the first batch into the store, replacing its contents.
    ///
    /// Returns `false` if a batch is already in flight.
    pub fn load_initial(&mut self, now: u64) -> bool {
        self.start_batch(FetchKind::Initial, self.config.initial_batch_size, now)
    }

    /// Requests a batch around the current view center.
    ///
    /// This is what an expired debounce runs. Returns `false`, and drops the
    /// request, if a batch is already in flight.
    pub fn fetch_widgets(&mut self, now: u64) -> bool {
        self.start_batch(FetchKind::Batch, self.config.batch_size, now)
    }

    /// Requests a single widget by id, independent of the batch in flight.
    pub fn request_widget(&mut self, id: &str, now: u64) {
        let pending = self.backend.fetch_one(id, now);
        tracing::debug!(target: "expanse.canvas", id, "widget requested");
        self.singles.push(InFlightWidget {
            id: id.to_owned(),
            pending,
        });
        self.observers.emit(Checkpoint::FetchStarted {
            kind: FetchKind::Single,
            at: now,
        });
    }

    fn schedule_fetch(&mut self, now: u64) {
        self.debounce.trigger(&mut self.timers, now, CanvasTimer::Fetch);
        self.observers.emit(Checkpoint::FetchScheduled {
            due: now.saturating_add(self.debounce.quiet_ms()),
        });
    }

    fn fire_timer(&mut self, at: u64) {
        let Some((id, CanvasTimer::Fetch)) = self.timers.pop_due(at) else {
            return;
        };
        if self.debounce.fire(id) {
            self.fetch_widgets(at);
        }
    }

    fn start_batch(&mut self, kind: FetchKind, count: usize, now: u64) -> bool {
        if self.batch.is_some() {
            tracing::debug!(target: "expanse.canvas", ?kind, "fetch skipped, batch in flight");
            self.observers.emit(Checkpoint::FetchSkipped { at: now });
            return false;
        }
        self.error = None;
        let center = self.viewport.world_center();
        let zoom = self.viewport.zoom();
        let request = BatchRequest::new(count, center, zoom);
        tracing::debug!(
            target: "expanse.canvas",
            ?kind,
            count,
            center_x = center.x,
            center_y = center.y,
            zoom,
            "fetch started"
        );
        let pending = self.backend.fetch_batch(request, now);
        self.batch = Some(InFlightBatch { kind, pending });
        self.observers.emit(Checkpoint::FetchStarted { kind, at: now });
        true
    }

    fn poll_batch(&mut self, at: u64) {
        let Some(batch) = self.batch.as_mut() else {
            return;
        };
        let Poll::Ready(result) = batch.pending.poll(at) else {
            return;
        };
        let kind = batch.kind;
        self.batch = None;

        let outcome = match result {
            Ok(widgets) => {
                let received = widgets.len();
                let added = match kind {
                    FetchKind::Initial => {
                        self.store.load(widgets);
                        received
                    }
                    FetchKind::Batch | FetchKind::Single => self.store.merge(widgets),
                };
                tracing::debug!(target: "expanse.canvas", ?kind, received, added, "fetch finished");
                FetchOutcome::Succeeded { received, added }
            }
            Err(err) => FetchOutcome::Failed {
                message: self.fail(kind, &err),
            },
        };
        self.observers.emit(Checkpoint::FetchEnded { kind, at, outcome });
    }

    /// Polls the single request at `index`; returns `true` if it completed
    /// and was removed.
    fn poll_single(&mut self, index: usize, at: u64) -> bool {
        let Poll::Ready(result) = self.singles[index].pending.poll(at) else {
            return false;
        };
        let done = self.singles.remove(index);
        let outcome = match result {
            Ok(widget) => {
                let added = self.store.merge([widget]);
                tracing::debug!(target: "expanse.canvas", id = %done.id, added, "widget received");
                FetchOutcome::Succeeded { received: 1, added }
            }
            Err(err) => FetchOutcome::Failed {
                message: self.fail(FetchKind::Single, &err),
            },
        };
        self.observers.emit(Checkpoint::FetchEnded {
            kind: FetchKind::Single,
            at,
            outcome,
        });
        true
    }

    fn fail(&mut self, kind: FetchKind, err: &FetchError) -> String {
        let message = err.to_string();
        match err.simulated() {
            Some(sim) => tracing::warn!(
                target: "expanse.canvas",
                ?kind,
                error_kind = %sim.kind,
                status = ?sim.status,
                message = %message,
                "fetch failed"
            ),
            None => tracing::warn!(target: "expanse.canvas", ?kind, message = %message, "fetch failed"),
        }
        self.error = Some(message.clone());
        message
    }

    // --- state ---

    /// `true` while a batch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.batch.is_some()
    }

    /// Number of single-widget requests in flight.
    #[must_use]
    pub fn pending_widget_requests(&self) -> usize {
        self.singles.len()
    }

    /// `true` while a debounced fetch is waiting to fire.
    #[must_use]
    pub fn is_fetch_scheduled(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Message of the most recent failed request, until the next batch starts.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Dismisses the error message.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// The camera.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The live pan/zoom transform.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.viewport.transform()
    }

    /// The live transform as an affine (translate by pan, scale by zoom).
    #[must_use]
    pub fn affine(&self) -> Affine {
        self.viewport.affine()
    }

    /// Loaded widgets.
    #[must_use]
    pub fn store(&self) -> &WidgetStore {
        &self.store
    }

    /// Shared snapshot of the loaded widgets.
    #[must_use]
    pub fn widgets(&self) -> Arc<Vec<Widget>> {
        self.store.snapshot()
    }

    /// The injected backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The injected backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // --- render boundary ---

    /// Every loaded widget with its footprint and visibility, in store order.
    pub fn render_items(&self) -> impl Iterator<Item = RenderItem<'_>> + '_ {
        let transform = self.viewport.transform();
        self.store.widgets().iter().map(move |widget| {
            let origin = widget.position();
            let world_rect = self.cull.widget_rect(origin);
            RenderItem {
                widget,
                world_rect,
                screen_rect: transform.world_to_screen_rect(world_rect),
                visible: self.cull.is_visible(&self.viewport, origin),
            }
        })
    }

    /// Whether `widget` currently overlaps the buffered viewport.
    #[must_use]
    pub fn is_visible(&self, widget: &Widget) -> bool {
        self.cull.is_visible(&self.viewport, widget.position())
    }

    // --- observers ---

    /// Registers an observer for lifecycle checkpoints.
    pub fn subscribe_checkpoints(
        &mut self,
        observer: impl FnMut(&Checkpoint) + 'static,
    ) -> ObserverId {
        self.observers.add(Box::new(observer))
    }

    /// Removes a checkpoint observer.
    pub fn unsubscribe_checkpoints(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Registers a listener for store changes.
    pub fn subscribe_store(&mut self, listener: impl FnMut(&StoreChange) + 'static) -> ListenerId {
        self.store.subscribe(listener)
    }

    /// Removes a store listener.
    pub fn unsubscribe_store(&mut self, id: ListenerId) -> bool {
        self.store.unsubscribe(id)
    }
}

impl Canvas<MockNetwork> {
    /// Shared error probability of the simulated backend.
    ///
    /// Clone the handle to adjust it from a settings panel or another thread.
    #[must_use]
    pub fn error_probability(&self) -> &ErrorProbability {
        self.backend.error_probability()
    }
}
