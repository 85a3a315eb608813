// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use kurbo::Point;

/// A content widget placed in world space.
///
/// Widgets are immutable once created; the store never edits them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Widget {
    id: String,
    title: String,
    content: String,
    x: f64,
    y: f64,
}

impl Widget {
    /// Creates a widget at `position` (world coordinates).
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        position: Point,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            x: position.x,
            y: position.y,
        }
    }

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Body text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Top‑left corner in world coordinates.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
