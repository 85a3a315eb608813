// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Vec2};

/// Uniform pan + zoom mapping from world space to screen space.
///
/// `pan` is the screen position of the world origin and `zoom` the scale
/// factor, so `screen = world * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Screen‑space offset of the world origin.
    pub pan: Vec2,
    /// Uniform scale factor.
    pub zoom: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No pan, unit zoom.
    pub const IDENTITY: Self = Self {
        pan: Vec2::ZERO,
        zoom: 1.0,
    };

    /// Maps a world point to the screen.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        (world.to_vec2() * self.zoom + self.pan).to_point()
    }

    /// Maps a screen point back into world space.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        ((screen.to_vec2() - self.pan) / self.zoom).to_point()
    }

    /// Maps a world rectangle to the screen.
    #[must_use]
    pub fn world_to_screen_rect(&self, rect: Rect) -> Rect {
        // Uniform positive zoom keeps corners ordered.
        Rect::from_points(
            self.world_to_screen(rect.origin()),
            self.world_to_screen(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Maps a screen rectangle into world space.
    #[must_use]
    pub fn screen_to_world_rect(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.screen_to_world(rect.origin()),
            self.screen_to_world(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Returns the transform as an affine: translate by pan, then scale by
    /// zoom, origin at the top-left of the viewport.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }
}
