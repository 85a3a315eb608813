// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Canvas: a headless infinite-canvas controller.
//!
//! [`Canvas`] ties the other Expanse crates together:
//! - pointer drags and wheel notches drive an `expanse_view2d` viewport,
//! - every effective view change restarts an `expanse_timing` debounce,
//! - an expired debounce asks a [`WidgetBackend`] for a batch around the view
//!   center, at most one batch at a time,
//! - arriving batches are merged into an `expanse_store` store by id,
//! - [`Canvas::render_items`] reports each widget's footprint and whether it
//!   overlaps the viewport plus a screen-space margin.
//!
//! Time is supplied by the host as milliseconds on every call. Nothing here
//! spawns threads or reads a clock, so the whole pipeline can be driven step
//! by step in tests.
//!
//! Lifecycle events are reported as [`Checkpoint`]s to observers and as
//! `tracing` events under the `expanse.canvas` target.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use expanse_canvas::{Canvas, CanvasConfig};
//! use expanse_mock_net::{ErrorProbability, MockNetwork};
//!
//! let net = MockNetwork::seeded(1, ErrorProbability::new(0.0).unwrap());
//! let mut canvas = Canvas::new(net, Size::new(800.0, 600.0), CanvasConfig::default());
//!
//! canvas.load_initial(0);
//! canvas.advance(2_000);
//! assert_eq!(canvas.store().len(), 20);
//!
//! // Drag, then wait out the debounce and the batch delay.
//! canvas.pointer_down(Point::new(100.0, 100.0));
//! canvas.pointer_move(Point::new(160.0, 100.0), 2_100);
//! canvas.pointer_up();
//! canvas.advance(2_500);
//! assert!(canvas.is_loading());
//! canvas.advance(4_500);
//! assert!(!canvas.is_loading());
//! assert_eq!(canvas.store().len(), 30);
//! ```

mod canvas;
mod checkpoint;
mod config;
mod render;

pub use canvas::Canvas;
pub use checkpoint::{Checkpoint, FetchKind, FetchOutcome, ObserverId};
pub use config::{CanvasConfig, ConfigError};
pub use render::RenderItem;

pub use expanse_mock_net::WidgetBackend;
