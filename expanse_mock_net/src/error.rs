// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::Serialize;

use crate::request::RequestParams;

/// Machine-readable class of a [`SimulatedError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Transient transport failure (simulated timeout).
    #[serde(rename = "NetworkError")]
    Network,
    /// Server-side fault or rejected request.
    #[serde(rename = "APIError")]
    Api,
    /// Requested resource does not exist.
    #[serde(rename = "NotFoundError")]
    NotFound,
}

impl ErrorKind {
    /// Name used in logs and synthetic stack traces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Network => "NetworkError",
            Self::Api => "APIError",
            Self::NotFound => "NotFoundError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A failure produced by the simulated backend.
#[derive(Clone, Debug, PartialEq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct SimulatedError {
    /// Human-readable message.
    pub message: String,
    /// Error class.
    pub kind: ErrorKind,
    /// HTTP-like status code, when the failure has one.
    pub status: Option<u16>,
    /// Creation time, RFC 3339 with millisecond precision.
    pub timestamp: String,
    /// Parameters of the request that failed.
    pub request: RequestParams,
    /// Synthetic stack trace for diagnostics.
    pub stack_trace: String,
}

/// Why a [`Pending`](crate::Pending) completion failed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The backend answered with an error.
    #[error(transparent)]
    Simulated(#[from] SimulatedError),
    /// The backend dropped the request without answering.
    #[error("request was dropped before completing")]
    Disconnected,
}

impl FetchError {
    /// The simulated error, if the backend produced one.
    #[must_use]
    pub fn simulated(&self) -> Option<&SimulatedError> {
        match self {
            Self::Simulated(err) => Some(err),
            Self::Disconnected => None,
        }
    }
}

/// Rejected [`ErrorProbability`](crate::ErrorProbability) value.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ProbabilityError {
    /// Value outside `[0, 1]` or not a number.
    #[error("error probability must be within [0, 1], got {0}")]
    OutOfRange(f64),
}
