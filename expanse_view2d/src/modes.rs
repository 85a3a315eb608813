// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Direction of a single zoom step.
///
/// Consumed by [`crate::Viewport::zoom_at`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Multiply the zoom by the step factor.
    In,
    /// Divide the zoom by the step factor.
    Out,
}

impl ZoomDirection {
    /// Decodes a wheel event's vertical delta.
    ///
    /// Wheel up (negative delta) zooms in, wheel down zooms out. A zero or
    /// NaN delta carries no direction.
    #[must_use]
    pub fn from_wheel_delta(delta_y: f64) -> Option<Self> {
        if delta_y < 0.0 {
            Some(Self::In)
        } else if delta_y > 0.0 {
            Some(Self::Out)
        } else {
            None
        }
    }
}
