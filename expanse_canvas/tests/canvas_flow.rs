// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives a canvas through input, debounce, fetch and merge with a scripted
//! backend and host-controlled time.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use expanse_canvas::{Canvas, CanvasConfig, Checkpoint, FetchKind, FetchOutcome, WidgetBackend};
use expanse_mock_net::{
    BatchRequest, Completer, ErrorKind, ErrorProbability, MockNetwork, Pending, RequestParams,
    SimulatedError,
};
use expanse_store::{StoreChange, Widget};
use kurbo::{Point, Size};

const LATENCY: u64 = 100;
const VIEW: Size = Size::new(800.0, 600.0);

type Reply = Result<Vec<Widget>, SimulatedError>;

/// Answers after a fixed latency, with queued replies or generated widgets.
#[derive(Debug, Default)]
struct Scripted {
    replies: VecDeque<Reply>,
    requests: Vec<(u64, BatchRequest)>,
    singles: Vec<String>,
    single_latency: Option<u64>,
    single_errors: VecDeque<SimulatedError>,
    generated: usize,
}

impl Scripted {
    fn reply(mut self, reply: Reply) -> Self {
        self.replies.push_back(reply);
        self
    }

    fn single_latency(mut self, ms: u64) -> Self {
        self.single_latency = Some(ms);
        self
    }

    fn single_error(mut self, error: SimulatedError) -> Self {
        self.single_errors.push_back(error);
        self
    }
}

impl WidgetBackend for Scripted {
    fn fetch_one(&mut self, id: &str, now: u64) -> Pending<Widget> {
        self.singles.push(id.to_owned());
        let ready_at = now + self.single_latency.unwrap_or(LATENCY);
        match self.single_errors.pop_front() {
            Some(err) => Pending::deferred(ready_at, Err(err)),
            None => Pending::deferred(ready_at, Ok(widget(id, Point::ZERO))),
        }
    }

    fn fetch_batch(&mut self, request: BatchRequest, now: u64) -> Pending<Vec<Widget>> {
        self.requests.push((now, request));
        let reply = self.replies.pop_front().unwrap_or_else(|| {
            let start = self.generated;
            self.generated += request.count;
            Ok((start..self.generated)
                .map(|n| widget(&format!("g{n}"), request.center))
                .collect())
        });
        Pending::deferred(now + LATENCY, reply)
    }
}

fn widget(id: &str, at: Point) -> Widget {
    Widget::new(id, format!("Widget {id}"), "body", at)
}

fn api_error() -> SimulatedError {
    SimulatedError {
        message: "Internal server error".to_owned(),
        kind: ErrorKind::Api,
        status: Some(500),
        timestamp: "2025-01-01T00:00:00.000Z".to_owned(),
        request: RequestParams::FetchOne { id: "x".to_owned() },
        stack_trace: String::new(),
    }
}

fn canvas(backend: Scripted) -> Canvas<Scripted> {
    Canvas::new(backend, VIEW, CanvasConfig::default())
}

fn record(canvas: &mut Canvas<Scripted>) -> Rc<RefCell<Vec<Checkpoint>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    canvas.subscribe_checkpoints(move |c| sink.borrow_mut().push(c.clone()));
    log
}

fn drag(canvas: &mut Canvas<Scripted>, from: Point, steps: &[(Point, u64)]) {
    canvas.pointer_down(from);
    for &(pos, now) in steps {
        canvas.pointer_move(pos, now);
    }
    canvas.pointer_up();
}

#[test]
fn initial_load_fills_the_store() {
    let mut canvas = canvas(Scripted::default());
    assert!(canvas.load_initial(0));
    assert!(canvas.is_loading());
    assert_eq!(canvas.next_wakeup(), Some(LATENCY));

    canvas.advance(LATENCY - 1);
    assert!(canvas.store().is_empty());

    canvas.advance(LATENCY);
    assert!(!canvas.is_loading());
    assert_eq!(canvas.store().len(), 20);
    let (_, request) = canvas.backend().requests[0];
    assert_eq!(request.count, 20);
    assert_eq!(request.center, Point::new(400.0, 300.0));
    assert_eq!(request.zoom, 1.0);
}

#[test]
fn burst_of_pans_produces_one_fetch() {
    let mut canvas = canvas(Scripted::default());
    drag(
        &mut canvas,
        Point::new(0.0, 0.0),
        &[
            (Point::new(10.0, 0.0), 0),
            (Point::new(20.0, 0.0), 100),
            (Point::new(30.0, 0.0), 200),
            (Point::new(40.0, 0.0), 300),
        ],
    );
    assert!(canvas.is_fetch_scheduled());

    // Quiet period restarts at every move; the last one was at 300.
    canvas.advance(699);
    assert!(canvas.backend().requests.is_empty());
    canvas.advance(700);
    assert_eq!(canvas.backend().requests.len(), 1);
    assert_eq!(canvas.backend().requests[0].0, 700);
    assert!(!canvas.is_fetch_scheduled());

    canvas.advance(10_000);
    assert_eq!(canvas.backend().requests.len(), 1);
    assert_eq!(canvas.store().len(), 10);
}

#[test]
fn pan_moves_the_fetch_center() {
    let mut canvas = canvas(Scripted::default());
    drag(&mut canvas, Point::new(0.0, 0.0), &[(Point::new(-100.0, -50.0), 0)]);
    canvas.advance(400);

    let (_, request) = canvas.backend().requests[0];
    let expected = canvas.viewport().world_center();
    assert_eq!(request.center, expected);
    assert_ne!(request.center, Point::new(400.0, 300.0));
}

#[test]
fn debounce_and_completion_run_in_time_order() {
    let mut canvas = canvas(Scripted::default());
    // Initial batch lands at 100; the debounce fires at 400.
    canvas.load_initial(0);
    drag(&mut canvas, Point::ZERO, &[(Point::new(5.0, 0.0), 0)]);

    // One late advance must replay both in order, or the debounced fetch
    // would be skipped as overlapping the initial load.
    canvas.advance(1_000);
    let starts: Vec<u64> = canvas.backend().requests.iter().map(|(t, _)| *t).collect();
    assert_eq!(starts, vec![0, 400]);

    // The debounced batch started at 400 and landed at 500.
    assert!(!canvas.is_loading());
    assert_eq!(canvas.store().len(), 30);
}

#[test]
fn fetch_while_loading_is_skipped() {
    let mut canvas = canvas(Scripted::default());
    let log = record(&mut canvas);

    assert!(canvas.load_initial(0));
    assert!(!canvas.fetch_widgets(10));
    assert_eq!(canvas.backend().requests.len(), 1);
    assert!(log.borrow().contains(&Checkpoint::FetchSkipped { at: 10 }));

    canvas.advance(LATENCY);
    assert!(canvas.fetch_widgets(LATENCY));
    assert_eq!(canvas.backend().requests.len(), 2);
}

#[test]
fn debounce_firing_during_a_batch_is_dropped() {
    let backend = Scripted::default();
    let mut canvas = Canvas::new(
        backend,
        VIEW,
        CanvasConfig {
            debounce_ms: 50,
            ..CanvasConfig::default()
        },
    );
    assert!(canvas.load_initial(0));
    drag(&mut canvas, Point::ZERO, &[(Point::new(1.0, 1.0), 0)]);

    canvas.advance(LATENCY);
    // The debounce fired at 50 while the initial batch was loading.
    assert_eq!(canvas.backend().requests.len(), 1);
    assert!(!canvas.is_fetch_scheduled());
    assert_eq!(canvas.store().len(), 20);
}

#[test]
fn failure_sets_the_error_and_clears_loading() {
    let mut canvas = canvas(Scripted::default().reply(Err(api_error())));
    let log = record(&mut canvas);

    canvas.load_initial(0);
    canvas.advance(LATENCY);

    assert!(!canvas.is_loading());
    assert_eq!(canvas.error(), Some("Internal server error"));
    assert!(canvas.store().is_empty());
    assert!(log.borrow().contains(&Checkpoint::FetchEnded {
        kind: FetchKind::Initial,
        at: LATENCY,
        outcome: FetchOutcome::Failed {
            message: "Internal server error".to_owned(),
        },
    }));

    // The next attempt clears the error when it starts.
    assert!(canvas.fetch_widgets(200));
    assert_eq!(canvas.error(), None);
}

#[test]
fn zoom_at_limit_schedules_nothing() {
    let mut canvas = Canvas::new(
        Scripted::default(),
        VIEW,
        CanvasConfig {
            max_zoom: 1.0,
            ..CanvasConfig::default()
        },
    );
    let log = record(&mut canvas);
    let cursor = Point::new(200.0, 200.0);

    assert!(!canvas.wheel(cursor, -120.0, 0));
    assert!(!canvas.is_fetch_scheduled());
    assert_eq!(
        *log.borrow(),
        vec![
            Checkpoint::ZoomStarted { cursor, zoom: 1.0 },
            Checkpoint::ZoomEnded {
                zoom: 1.0,
                changed: false
            },
        ]
    );

    assert!(canvas.wheel(cursor, 120.0, 0));
    assert!(canvas.is_fetch_scheduled());
    assert!((canvas.transform().zoom - 1.0 / 1.15).abs() < 1e-12);
}

#[test]
fn zero_wheel_delta_is_ignored() {
    let mut canvas = canvas(Scripted::default());
    let before = canvas.transform();
    assert!(!canvas.wheel(Point::new(10.0, 10.0), 0.0, 0));
    assert_eq!(canvas.transform(), before);
}

#[test]
fn duplicate_batches_leave_the_snapshot_untouched() {
    let batch = vec![widget("a", Point::ZERO), widget("b", Point::ZERO)];
    let mut canvas = canvas(
        Scripted::default()
            .reply(Ok(batch.clone()))
            .reply(Ok(batch)),
    );
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    canvas.subscribe_store(move |c| sink.borrow_mut().push(*c));

    canvas.fetch_widgets(0);
    canvas.advance(LATENCY);
    let first = canvas.widgets();
    assert_eq!(first.len(), 2);

    canvas.fetch_widgets(LATENCY);
    canvas.advance(2 * LATENCY);
    assert!(Arc::ptr_eq(&first, &canvas.widgets()));
    assert_eq!(*changes.borrow(), vec![StoreChange::Appended { count: 2 }]);
}

#[test]
fn single_widget_requests_merge_independently() {
    let mut canvas = canvas(Scripted::default());
    canvas.load_initial(0);
    canvas.request_widget("solo", 10);
    canvas.request_widget("solo", 20);
    assert_eq!(canvas.pending_widget_requests(), 2);
    assert_eq!(canvas.backend().singles, ["solo", "solo"]);

    canvas.advance(LATENCY);
    assert_eq!(canvas.store().len(), 20);
    assert_eq!(canvas.pending_widget_requests(), 2);

    canvas.advance(LATENCY + 20);
    assert_eq!(canvas.pending_widget_requests(), 0);
    assert_eq!(canvas.store().len(), 21);
    assert!(canvas.store().contains("solo"));
}

#[test]
fn singles_and_batches_apply_in_completion_order() {
    let mut canvas = canvas(Scripted::default().single_latency(LATENCY / 2));
    let log = record(&mut canvas);

    assert!(canvas.fetch_widgets(0));
    canvas.request_widget("solo", 0);
    canvas.advance(1_000);

    let ids: Vec<&str> = canvas.store().iter().map(Widget::id).collect();
    assert_eq!(ids.len(), 11);
    assert_eq!(ids[0], "solo");
    assert_eq!(ids[1], "g0");

    let ends: Vec<(FetchKind, u64)> = log
        .borrow()
        .iter()
        .filter_map(|c| match c {
            Checkpoint::FetchEnded { kind, at, .. } => Some((*kind, *at)),
            _ => None,
        })
        .collect();
    assert_eq!(
        ends,
        vec![(FetchKind::Single, LATENCY / 2), (FetchKind::Batch, LATENCY)]
    );
}

#[test]
fn batch_started_after_a_failed_single_clears_its_error() {
    let mut canvas = canvas(
        Scripted::default()
            .single_latency(50)
            .single_error(api_error()),
    );
    canvas.request_widget("lost", 0);
    drag(&mut canvas, Point::ZERO, &[(Point::new(5.0, 0.0), 0)]);

    // The single fails at 50, the debounced batch starts at 400 and lands
    // at 500.
    canvas.advance(1_000);
    assert_eq!(canvas.error(), None);
    assert_eq!(canvas.store().len(), 10);
    assert!(!canvas.store().contains("lost"));
}

#[test]
fn resize_restarts_the_debounce() {
    let mut canvas = canvas(Scripted::default());
    let log = record(&mut canvas);

    assert!(canvas.resize(Size::new(1_000.0, 800.0), 0));
    assert!(canvas.resize(Size::new(1_200.0, 900.0), 300));
    assert!(log.borrow().contains(&Checkpoint::FetchScheduled { due: 700 }));

    canvas.advance(699);
    assert!(canvas.backend().requests.is_empty());
    canvas.advance(700);
    assert_eq!(canvas.backend().requests.len(), 1);

    // The fetch center follows the new view size.
    let (at, request) = canvas.backend().requests[0];
    assert_eq!(at, 700);
    assert_eq!(request.center, Point::new(600.0, 450.0));
}

#[test]
fn same_size_resize_schedules_nothing() {
    let mut canvas = canvas(Scripted::default());
    assert!(!canvas.resize(VIEW, 0));
    assert!(!canvas.is_fetch_scheduled());
    assert_eq!(canvas.next_wakeup(), None);
}

#[test]
fn channelled_batches_complete_when_sent() {
    #[derive(Debug, Default)]
    struct Remote {
        completers: Vec<Completer<Vec<Widget>>>,
    }

    impl WidgetBackend for Remote {
        fn fetch_one(&mut self, _id: &str, _now: u64) -> Pending<Widget> {
            Pending::channel().1
        }

        fn fetch_batch(&mut self, _request: BatchRequest, _now: u64) -> Pending<Vec<Widget>> {
            let (completer, pending) = Pending::channel();
            self.completers.push(completer);
            pending
        }
    }

    let mut canvas = Canvas::new(Remote::default(), VIEW, CanvasConfig::default());
    canvas.load_initial(0);
    assert_eq!(canvas.next_wakeup(), None);
    canvas.advance(5_000);
    assert!(canvas.is_loading());

    let completer = canvas.backend_mut().completers.pop().unwrap();
    assert!(completer.complete(Ok(vec![widget("r", Point::ZERO)])));
    canvas.advance(5_001);
    assert!(!canvas.is_loading());
    assert_eq!(canvas.store().len(), 1);

    // A backend that drops the request surfaces a disconnect.
    canvas.fetch_widgets(6_000);
    canvas.backend_mut().completers.clear();
    canvas.advance(6_001);
    assert!(!canvas.is_loading());
    assert!(canvas.error().is_some());
}

#[test]
fn render_items_flag_offscreen_widgets() {
    let mut canvas = canvas(
        Scripted::default().reply(Ok(vec![
            widget("near", Point::new(100.0, 100.0)),
            widget("edge", Point::new(900.0, 300.0)),
            widget("far", Point::new(5_000.0, 5_000.0)),
        ])),
    );
    canvas.load_initial(0);
    canvas.advance(LATENCY);

    let visible: Vec<(&str, bool)> = canvas
        .render_items()
        .map(|item| (item.widget.id(), item.visible))
        .collect();
    assert_eq!(
        visible,
        vec![("near", true), ("edge", true), ("far", false)]
    );

    let near = canvas.render_items().next().unwrap();
    assert_eq!(near.screen_rect, near.world_rect);

    // Zooming out far enough brings everything into the buffered view.
    for _ in 0..20 {
        canvas.wheel(Point::ZERO, 1.0, 0);
    }
    assert!(canvas.render_items().all(|item| item.visible));
}

#[test]
fn checkpoints_trace_a_pan_and_its_fetch() {
    let mut canvas = canvas(Scripted::default());
    let log = record(&mut canvas);

    drag(&mut canvas, Point::ZERO, &[(Point::new(3.0, 4.0), 0)]);
    canvas.advance(400 + LATENCY);

    assert_eq!(
        *log.borrow(),
        vec![
            Checkpoint::PanStarted { anchor: Point::ZERO },
            Checkpoint::FetchScheduled { due: 400 },
            Checkpoint::PanEnded,
            Checkpoint::FetchStarted {
                kind: FetchKind::Batch,
                at: 400,
            },
            Checkpoint::FetchEnded {
                kind: FetchKind::Batch,
                at: 500,
                outcome: FetchOutcome::Succeeded {
                    received: 10,
                    added: 10,
                },
            },
        ]
    );
}

#[test]
fn mock_network_end_to_end() {
    let probability = ErrorProbability::new(1.0).unwrap();
    let net = MockNetwork::seeded(11, probability.clone());
    let mut canvas = Canvas::new(net, VIEW, CanvasConfig::default());

    canvas.load_initial(0);
    canvas.advance(2_000);
    assert!(canvas.store().is_empty());
    assert!(canvas.error().is_some());

    // The handle is shared with the backend, so lowering it takes effect.
    probability.set(0.0).unwrap();
    canvas.fetch_widgets(3_000);
    canvas.advance(5_000);
    assert_eq!(canvas.error(), None);
    assert_eq!(canvas.store().len(), 10);
}
