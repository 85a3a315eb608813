// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan drag tracking: anchor on press, deltas on move.
//!
//! ## Usage
//!
//! 1) On pointer‑down call [`PanDrag::press`] with the screen position.
//! 2) On each pointer‑move call [`PanDrag::move_to`]; while a drag is active
//!    it returns the screen delta since the previous position.
//! 3) On pointer‑up (or pointer‑leave) call [`PanDrag::release`].
//!
//! Moves without a preceding press return `None`, so hover movement never
//! pans the canvas.

use kurbo::{Point, Vec2};

/// Tracks one pan gesture.
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct PanDrag {
    anchor: Option<Point>,
    last: Option<Point>,
}

impl PanDrag {
    /// Starts a gesture anchored at `pos`, replacing any active one.
    pub fn press(&mut self, pos: Point) {
        self.anchor = Some(pos);
        self.last = Some(pos);
    }

    /// Moves the pointer to `pos`, returning the delta since the last position.
    pub fn move_to(&mut self, pos: Point) -> Option<Vec2> {
        self.anchor?;
        let last = self.last.replace(pos)?;
        Some(pos - last)
    }

    /// Total movement since the press.
    pub fn total_offset(&self, pos: Point) -> Option<Vec2> {
        self.anchor.map(|anchor| pos - anchor)
    }

    /// Ends the gesture. Returns `true` if one was active.
    pub fn release(&mut self) -> bool {
        let was_active = self.anchor.is_some();
        self.anchor = None;
        self.last = None;
        was_active
    }

    /// Returns `true` between press and release.
    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    /// Screen position of the press, if active.
    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_by_default() {
        let drag = PanDrag::default();
        assert!(!drag.is_active());
        assert_eq!(drag.anchor(), None);
    }

    #[test]
    fn press_sets_anchor() {
        let mut drag = PanDrag::default();
        drag.press(Point::new(10.0, 20.0));
        assert!(drag.is_active());
        assert_eq!(drag.anchor(), Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut drag = PanDrag::default();
        assert_eq!(drag.move_to(Point::new(15.0, 25.0)), None);
        assert!(!drag.is_active());
    }

    #[test]
    fn moves_report_incremental_deltas() {
        let mut drag = PanDrag::default();
        drag.press(Point::new(0.0, 0.0));

        assert_eq!(drag.move_to(Point::new(5.0, 3.0)), Some(Vec2::new(5.0, 3.0)));
        assert_eq!(drag.move_to(Point::new(8.0, 7.0)), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(drag.move_to(Point::new(2.0, 7.0)), Some(Vec2::new(-6.0, 0.0)));
        assert_eq!(
            drag.total_offset(Point::new(2.0, 7.0)),
            Some(Vec2::new(2.0, 7.0))
        );
    }

    #[test]
    fn deltas_sum_to_total_offset() {
        let mut drag = PanDrag::default();
        let start = Point::new(100.0, 100.0);
        drag.press(start);

        let mut sum = Vec2::ZERO;
        for p in [(120.0, 90.0), (80.0, 140.0), (101.0, 99.5)] {
            sum += drag.move_to(p.into()).unwrap();
        }
        assert_eq!(drag.total_offset(Point::new(101.0, 99.5)), Some(sum));
    }

    #[test]
    fn release_ends_gesture() {
        let mut drag = PanDrag::default();
        drag.press(Point::new(10.0, 20.0));
        assert!(drag.release());
        assert!(!drag.is_active());
        assert!(!drag.release());
        assert_eq!(drag.move_to(Point::new(50.0, 50.0)), None);
        assert_eq!(drag.total_offset(Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn press_restarts_gesture() {
        let mut drag = PanDrag::default();
        drag.press(Point::new(0.0, 0.0));
        drag.move_to(Point::new(10.0, 10.0));

        drag.press(Point::new(50.0, 60.0));
        assert_eq!(drag.move_to(Point::new(55.0, 65.0)), Some(Vec2::new(5.0, 5.0)));
    }
}
