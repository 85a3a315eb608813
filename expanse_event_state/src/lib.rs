// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Event State: pointer interaction state for canvas panning.
//!
//! - [`drag`]: Track a pan gesture from pointer‑down to pointer‑up, producing
//!   per‑move screen deltas.
//!
//! The state machine accepts raw pointer positions in screen coordinates and
//! does not know about zoom; converting deltas into world units is left to
//! `expanse_view2d`.
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use expanse_event_state::drag::PanDrag;
//!
//! let mut drag = PanDrag::default();
//! drag.press(Point::new(10.0, 10.0));
//! assert_eq!(drag.move_to(Point::new(15.0, 12.0)), Some(Vec2::new(5.0, 2.0)));
//! drag.release();
//! assert_eq!(drag.move_to(Point::new(30.0, 30.0)), None);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod drag;
