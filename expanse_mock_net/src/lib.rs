// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Mock Net: the widget network boundary and a simulated backend.
//!
//! Components that need widgets talk to a [`WidgetBackend`]. Every request
//! returns a [`Pending`] completion that the caller polls with the host's
//! current time; results may arrive in any order.
//!
//! [`MockNetwork`] implements the boundary without any I/O:
//! - Each call waits a random delay (`[200, 1000]` ms for a single widget,
//!   `[500, 2000]` ms for a batch).
//! - Each call fails with the probability held by a shared
//!   [`ErrorProbability`], picking one of four [`SimulatedError`] templates.
//! - Successful batches scatter widgets around the requested center within
//!   `300 / zoom` world units per axis.
//! - Every call emits a structured `tracing` record under the
//!   `expanse.mock_net` target.
//!
//! A real backend implements the same trait, typically by handing out the
//! receiving half of [`Pending::channel`].
//!
//! ## Minimal example
//!
//! ```rust
//! use std::task::Poll;
//!
//! use kurbo::Point;
//! use expanse_mock_net::{BatchRequest, ErrorProbability, MockNetwork, WidgetBackend};
//!
//! let probability = ErrorProbability::new(0.0).unwrap();
//! let mut net = MockNetwork::seeded(7, probability);
//!
//! let mut pending = net.fetch_batch(BatchRequest::new(5, Point::ZERO, 1.0), 0);
//! assert!(pending.poll(0).is_pending());
//!
//! match pending.poll(2_000) {
//!     Poll::Ready(Ok(widgets)) => assert_eq!(widgets.len(), 5),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

mod backend;
mod error;
mod mock;
mod pending;
mod probability;
mod record;
mod request;

pub use backend::WidgetBackend;
pub use error::{ErrorKind, FetchError, ProbabilityError, SimulatedError};
pub use mock::{DelayRange, MockNetwork, MockNetworkConfig};
pub use pending::{Completer, Pending};
pub use probability::ErrorProbability;
pub use request::{BatchRequest, RequestParams};
