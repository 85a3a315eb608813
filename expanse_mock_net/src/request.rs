// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use serde::Serialize;

/// A request for `count` widgets around a world-space center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatchRequest {
    /// Number of widgets to return.
    pub count: usize,
    /// World point the batch is spread around.
    pub center: Point,
    /// Zoom at request time; narrows the spawn radius as it grows.
    pub zoom: f64,
}

impl BatchRequest {
    /// Creates a batch request.
    #[must_use]
    pub const fn new(count: usize, center: Point, zoom: f64) -> Self {
        Self {
            count,
            center,
            zoom,
        }
    }
}

/// Parameters of a request, as carried by logs and errors.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum RequestParams {
    /// A single widget by id.
    FetchOne {
        /// Requested id.
        id: String,
    },
    /// A batch around a center.
    FetchBatch {
        /// Number of widgets requested.
        count: usize,
        /// World-space center, x.
        center_x: f64,
        /// World-space center, y.
        center_y: f64,
        /// Zoom at request time.
        zoom: f64,
    },
}

impl RequestParams {
    /// Name of the backend method.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::FetchOne { .. } => "fetch_one",
            Self::FetchBatch { .. } => "fetch_batch",
        }
    }

    /// JSON rendering for log fields.
    pub(crate) fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

impl From<&BatchRequest> for RequestParams {
    fn from(request: &BatchRequest) -> Self {
        Self::FetchBatch {
            count: request.count,
            center_x: request.center.x,
            center_y: request.center.y,
            zoom: request.zoom,
        }
    }
}
