// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::modes::ZoomDirection;
use crate::transform::Transform;

/// Default lower zoom bound.
const MIN_ZOOM: f64 = 0.1;
/// Default upper zoom bound.
const MAX_ZOOM: f64 = 10.0;
/// Default factor applied per wheel notch.
const ZOOM_STEP: f64 = 1.15;

/// Camera over an unbounded world plane.
///
/// `Viewport` owns the [`Transform`] together with the viewport's pixel size
/// and zoom limits. It can be used to:
/// - Pan by screen‑space drag deltas.
/// - Zoom in steps around a cursor, keeping the world point under it fixed.
/// - Convert points and rectangles between world and screen coordinates.
///
/// Panning is never clamped; the world has no bounds.
#[derive(Clone, Debug)]
pub struct Viewport {
    view_size: Size,
    transform: Transform,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
}

impl Viewport {
    /// Creates a viewport of the given pixel size with the identity transform.
    ///
    /// - Zoom is clamped to `[0.1, 10]` by default.
    /// - Each zoom step scales by `1.15`.
    #[must_use]
    pub fn new(view_size: Size) -> Self {
        Self {
            view_size,
            transform: Transform::IDENTITY,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
        }
    }

    /// Returns the viewport size in pixels.
    #[must_use]
    pub fn view_size(&self) -> Size {
        self.view_size
    }

    /// Sets the viewport size in pixels.
    ///
    /// Pan and zoom are unchanged; only the visible world region moves.
    /// Returns `true` if the size changed.
    pub fn set_view_size(&mut self, size: Size) -> bool {
        if self.view_size == size {
            return false;
        }
        self.view_size = size;
        true
    }

    /// Returns the current transform.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Returns the current uniform zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.transform.zoom
    }

    /// Returns the screen‑space pan offset.
    #[must_use]
    pub fn pan(&self) -> Vec2 {
        self.transform.pan
    }

    /// Returns the zoom limits as `(min, max)`.
    #[must_use]
    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Sets the minimum and maximum zoom factors.
    ///
    /// The provided range is normalized so that `min_zoom <= max_zoom`, and
    /// the current zoom is clamped into it. Non-positive or non-finite limits
    /// are ignored.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        if !(min_zoom.is_finite() && max_zoom.is_finite()) || min_zoom <= 0.0 || max_zoom <= 0.0 {
            return;
        }
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.transform.zoom = self.transform.zoom.clamp(min_zoom, max_zoom);
    }

    /// Returns the factor applied per zoom step.
    #[must_use]
    pub fn zoom_step(&self) -> f64 {
        self.zoom_step
    }

    /// Sets the factor applied per zoom step. Values `<= 1` are ignored.
    pub fn set_zoom_step(&mut self, step: f64) {
        if step.is_finite() && step > 1.0 {
            self.zoom_step = step;
        }
    }

    /// Pans by a drag delta in screen pixels.
    ///
    /// The delta is converted to world units by dividing by the current zoom
    /// before it is added to the pan offset. Returns `false` for a zero delta.
    pub fn pan_by_screen_delta(&mut self, delta: Vec2) -> bool {
        if delta == Vec2::ZERO || !delta.is_finite() {
            return false;
        }
        self.transform.pan += delta / self.transform.zoom;
        true
    }

    /// Zooms one step around `cursor` (screen coordinates).
    ///
    /// Returns `false` when the clamped zoom equals the current zoom; the
    /// transform is then left untouched.
    pub fn zoom_at(&mut self, cursor: Point, direction: ZoomDirection) -> bool {
        let old = self.transform.zoom;
        let target = match direction {
            ZoomDirection::In => old * self.zoom_step,
            ZoomDirection::Out => old / self.zoom_step,
        };
        self.set_zoom_about(cursor, target)
    }

    /// Sets the zoom to `zoom` (clamped) keeping the world point under
    /// `cursor` fixed on screen.
    ///
    /// Returns `false` if the zoom did not change.
    pub fn set_zoom_about(&mut self, cursor: Point, zoom: f64) -> bool {
        if !zoom.is_finite() || zoom <= 0.0 {
            return false;
        }
        let old = self.transform.zoom;
        let new = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new - old).abs() < f64::EPSILON {
            return false;
        }

        // World point under the cursor with the old transform; solve
        // `cursor = world * new + pan` for the new pan.
        let world = self.transform.screen_to_world(cursor);
        self.transform.zoom = new;
        self.transform.pan = cursor.to_vec2() - world.to_vec2() * new;
        true
    }

    /// Maps a world point to the screen.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        self.transform.world_to_screen(world)
    }

    /// Maps a screen point into world space.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.transform.screen_to_world(screen)
    }

    /// Returns the world‑space rectangle covered by the viewport.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        self.transform
            .screen_to_world_rect(self.view_size.to_rect())
    }

    /// Returns the world point under the viewport center.
    #[must_use]
    pub fn world_center(&self) -> Point {
        let center = self.view_size.to_rect().center();
        self.transform.screen_to_world(center)
    }

    /// Returns the world‑units‑per‑pixel ratio, `1 / zoom`.
    #[must_use]
    pub fn world_units_per_pixel(&self) -> f64 {
        1.0 / self.transform.zoom
    }

    /// Returns the transform as an affine for the presentation layer.
    #[must_use]
    pub fn affine(&self) -> Affine {
        self.transform.to_affine()
    }

    /// Snapshot of the current viewport state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            view_size: self.view_size,
            visible_world_rect: self.visible_world_rect(),
            world_center: self.world_center(),
            zoom: self.transform.zoom,
            pan: self.transform.pan,
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
        }
    }
}

/// Debug snapshot of a [`Viewport`] state.
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// Viewport size in pixels.
    pub view_size: Size,
    /// World‑space rectangle currently visible.
    pub visible_world_rect: Rect,
    /// World point under the viewport center.
    pub world_center: Point,
    /// Current uniform zoom factor.
    pub zoom: f64,
    /// Current pan offset in screen coordinates.
    pub pan: Vec2,
    /// Minimum zoom factor.
    pub min_zoom: f64,
    /// Maximum zoom factor.
    pub max_zoom: f64,
}
