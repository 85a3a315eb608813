// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured log records for simulated requests.

use serde::Serialize;

use crate::error::SimulatedError;
use crate::request::RequestParams;

/// Longest result excerpt kept in a success record, in bytes.
const RESULT_EXCERPT_LEN: usize = 200;

/// Records a request that will succeed.
pub(crate) fn request_succeeded<T: Serialize>(params: &RequestParams, delay_ms: u64, result: &T) {
    let body = serde_json::to_string(result).unwrap_or_default();
    tracing::info!(
        target: "expanse.mock_net",
        method = params.method(),
        duration_ms = delay_ms,
        params = %params.to_json(),
        result = %excerpt(&body, RESULT_EXCERPT_LEN),
        "mock request succeeded"
    );
}

/// Records a request that will fail.
pub(crate) fn request_failed(params: &RequestParams, delay_ms: u64, error: &SimulatedError) {
    tracing::warn!(
        target: "expanse.mock_net",
        method = params.method(),
        duration_ms = delay_ms,
        params = %params.to_json(),
        kind = %error.kind,
        status = ?error.status,
        message = %error.message,
        timestamp = %error.timestamp,
        "mock request failed"
    );
}

fn excerpt(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_owned();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
