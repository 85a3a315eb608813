// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::Deserialize;

/// Invalid or unreadable [`CanvasConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input was not valid JSON for this shape.
    #[error("failed to parse canvas config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field held a value outside its domain.
    #[error("invalid canvas config: `{field}` {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Tunables of a [`Canvas`](crate::Canvas).
///
/// Every field has a default, so a JSON document only needs to name the
/// fields it overrides:
///
/// ```rust
/// use expanse_canvas::CanvasConfig;
///
/// let config = CanvasConfig::from_json(r#"{ "debounce_ms": 250 }"#).unwrap();
/// assert_eq!(config.debounce_ms, 250);
/// assert_eq!(config.batch_size, CanvasConfig::default().batch_size);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Quiet period before a fetch fires, in milliseconds.
    pub debounce_ms: u64,
    /// Widgets requested per debounced fetch.
    pub batch_size: usize,
    /// Widgets requested by the initial load.
    pub initial_batch_size: usize,
    /// Zoom factor per wheel notch.
    pub zoom_step: f64,
    /// Lowest zoom.
    pub min_zoom: f64,
    /// Highest zoom.
    pub max_zoom: f64,
    /// Widget footprint width in world units.
    pub widget_width: f64,
    /// Widget footprint height in world units.
    pub widget_height: f64,
    /// Screen-space buffer around the viewport for culling, in pixels.
    pub cull_margin_px: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 400,
            batch_size: 10,
            initial_batch_size: 20,
            zoom_step: 1.15,
            min_zoom: 0.1,
            max_zoom: 10.0,
            widget_width: 220.0,
            widget_height: 150.0,
            cull_margin_px: 100.0,
        }
    }
}

impl CanvasConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field against its domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return invalid("zoom_step", "must be finite and greater than 1");
        }
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return invalid("min_zoom", "must be finite and positive");
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            return invalid("max_zoom", "must be finite and at least `min_zoom`");
        }
        if !(self.widget_width.is_finite() && self.widget_width >= 0.0) {
            return invalid("widget_width", "must be finite and non-negative");
        }
        if !(self.widget_height.is_finite() && self.widget_height >= 0.0) {
            return invalid("widget_height", "must be finite and non-negative");
        }
        if !(self.cull_margin_px.is_finite() && self.cull_margin_px >= 0.0) {
            return invalid("cull_margin_px", "must be finite and non-negative");
        }
        Ok(())
    }
}
