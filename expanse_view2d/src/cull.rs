// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size};

use crate::viewport::Viewport;

/// Buffered visibility test for fixed‑size widgets.
///
/// The viewport's world rectangle is inflated by `margin_px / zoom` world
/// units on every side, so the buffer stays a constant number of pixels on
/// screen. A widget is visible when its world rectangle overlaps the inflated
/// rectangle; touching edges count as overlap.
///
/// Visibility only drives presentation. It says nothing about whether a
/// widget should be fetched or stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cull {
    /// World‑space footprint of every widget, anchored at its position.
    pub footprint: Size,
    /// Screen‑space buffer added around the viewport.
    pub margin_px: f64,
}

impl Default for Cull {
    fn default() -> Self {
        Self {
            footprint: Size::new(220.0, 150.0),
            margin_px: 100.0,
        }
    }
}

impl Cull {
    /// World rectangle of a widget positioned at `origin`.
    #[must_use]
    pub fn widget_rect(&self, origin: Point) -> Rect {
        Rect::from_origin_size(origin, self.footprint)
    }

    /// Visible world rectangle inflated by the screen‑space margin.
    #[must_use]
    pub fn buffered_world_rect(&self, viewport: &Viewport) -> Rect {
        let margin = self.margin_px / viewport.zoom();
        viewport.visible_world_rect().inflate(margin, margin)
    }

    /// Returns `true` if a widget at `origin` overlaps the buffered viewport.
    #[must_use]
    pub fn is_visible(&self, viewport: &Viewport, origin: Point) -> bool {
        overlaps(self.widget_rect(origin), self.buffered_world_rect(viewport))
    }
}

fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}
