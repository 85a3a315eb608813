// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use expanse_store::Widget;
use kurbo::Rect;

/// One widget as the presentation layer should draw it.
///
/// Hidden widgets are still reported; the presentation layer decides whether
/// to fade them out or skip drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderItem<'a> {
    /// The widget record.
    pub widget: &'a Widget,
    /// Footprint in world coordinates.
    pub world_rect: Rect,
    /// Footprint in screen coordinates under the current transform.
    pub screen_rect: Rect,
    /// Whether the footprint overlaps the buffered viewport.
    pub visible: bool,
}
