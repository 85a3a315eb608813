// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse View 2D: the pan/zoom transform of an infinite canvas.
//!
//! This crate provides a small, headless model of the canvas camera:
//! - [`Transform`]: screen‑space pan offset of the world origin plus a uniform
//!   zoom factor, with `screen = world * zoom + pan`.
//! - [`Viewport`]: a transform bound to a viewport pixel size and zoom limits,
//!   with drag panning and zoom‑to‑cursor.
//! - [`Cull`]: buffered visibility tests for fixed‑size widgets.
//!
//! It does **not** own any widgets or a rendering backend. Callers feed
//! pointer and wheel input into the viewport and read back the transform
//! (for example as a [`kurbo::Affine`]) to draw with.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use expanse_view2d::{Viewport, ZoomDirection};
//!
//! let mut view = Viewport::new(Size::new(800.0, 600.0));
//!
//! // Wheel up over the point (200, 150): zoom in, keeping that point fixed.
//! let cursor = Point::new(200.0, 150.0);
//! let under_cursor = view.screen_to_world(cursor);
//! assert!(view.zoom_at(cursor, ZoomDirection::In));
//! let back = view.world_to_screen(under_cursor);
//! assert!((back - cursor).hypot() < 1e-9);
//! ```
//!
//! ## Culling example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use expanse_view2d::{Cull, Viewport};
//!
//! let view = Viewport::new(Size::new(800.0, 600.0));
//! let cull = Cull::default();
//!
//! assert!(cull.is_visible(&view, Point::new(10.0, 10.0)));
//! assert!(!cull.is_visible(&view, Point::new(5_000.0, 5_000.0)));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod cull;
mod modes;
mod transform;
mod viewport;

pub use cull::Cull;
pub use modes::ZoomDirection;
pub use transform::Transform;
pub use viewport::{Viewport, ViewportDebugInfo};
