// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated widget backend with randomized latency and failures.

use chrono::{SecondsFormat, Utc};
use expanse_store::Widget;
use kurbo::Point;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::backend::WidgetBackend;
use crate::error::{ErrorKind, SimulatedError};
use crate::pending::Pending;
use crate::probability::ErrorProbability;
use crate::record;
use crate::request::{BatchRequest, RequestParams};

/// Inclusive range of simulated latencies in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayRange {
    /// Shortest delay.
    pub min_ms: u64,
    /// Longest delay.
    pub max_ms: u64,
}

impl DelayRange {
    /// Creates a range; the bounds are reordered if needed.
    #[must_use]
    pub const fn new(a: u64, b: u64) -> Self {
        if a <= b {
            Self { min_ms: a, max_ms: b }
        } else {
            Self { min_ms: b, max_ms: a }
        }
    }

    fn sample(self, rng: &mut SmallRng) -> u64 {
        rng.random_range(self.min_ms.min(self.max_ms)..=self.max_ms.max(self.min_ms))
    }
}

/// Tunables of [`MockNetwork`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MockNetworkConfig {
    /// Latency of [`WidgetBackend::fetch_one`].
    pub fetch_one_delay: DelayRange,
    /// Latency of [`WidgetBackend::fetch_batch`].
    pub fetch_batch_delay: DelayRange,
    /// Single widgets land in `[-spread, spread]` on each axis.
    pub fetch_one_spread: f64,
    /// Batch spawn radius at zoom 1; divided by the request zoom.
    pub spawn_radius: f64,
}

impl Default for MockNetworkConfig {
    fn default() -> Self {
        Self {
            fetch_one_delay: DelayRange::new(200, 1_000),
            fetch_batch_delay: DelayRange::new(500, 2_000),
            fetch_one_spread: 500.0,
            spawn_radius: 300.0,
        }
    }
}

struct ErrorTemplate {
    kind: ErrorKind,
    status: Option<u16>,
    message: &'static str,
}

static ERROR_TEMPLATES: [ErrorTemplate; 4] = [
    ErrorTemplate {
        kind: ErrorKind::Network,
        status: None,
        message: "Network request timed out",
    },
    ErrorTemplate {
        kind: ErrorKind::Api,
        status: Some(500),
        message: "Internal server error",
    },
    ErrorTemplate {
        kind: ErrorKind::NotFound,
        status: Some(404),
        message: "Requested widget was not found",
    },
    ErrorTemplate {
        kind: ErrorKind::Api,
        status: Some(400),
        message: "Invalid request parameters",
    },
];

const INVALID_PARAMS: usize = 3;

const CONTENT: [&str; 6] = [
    "Quarterly numbers at a glance.",
    "Notes from the design review.",
    "Open questions for the next sprint.",
    "A sketch of the onboarding flow.",
    "Latency budget per request stage.",
    "Links collected while researching.",
];

/// In-process stand-in for a widget server.
///
/// Outcomes are decided when a request is issued and delivered through a
/// deferred [`Pending`] after the sampled latency. Construct one per canvas
/// (or share it behind `&mut`) and pass it in; there is no global instance.
#[derive(Debug)]
pub struct MockNetwork {
    rng: SmallRng,
    error_probability: ErrorProbability,
    config: MockNetworkConfig,
    created: u64,
}

impl MockNetwork {
    /// Creates a service seeded from the operating system.
    #[must_use]
    pub fn new(error_probability: ErrorProbability) -> Self {
        Self::with_rng(SmallRng::from_os_rng(), error_probability)
    }

    /// Creates a service with a fixed seed, for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64, error_probability: ErrorProbability) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed), error_probability)
    }

    fn with_rng(rng: SmallRng, error_probability: ErrorProbability) -> Self {
        Self {
            rng,
            error_probability,
            config: MockNetworkConfig::default(),
            created: 0,
        }
    }

    /// Replaces the tunables.
    #[must_use]
    pub fn with_config(mut self, config: MockNetworkConfig) -> Self {
        self.config = config;
        self
    }

    /// Current tunables.
    #[must_use]
    pub fn config(&self) -> &MockNetworkConfig {
        &self.config
    }

    /// Handle to the shared error probability.
    #[must_use]
    pub fn error_probability(&self) -> &ErrorProbability {
        &self.error_probability
    }

    /// Bernoulli trial against the current error probability.
    fn roll_failure(&mut self) -> Option<&'static ErrorTemplate> {
        let p = self.error_probability.get();
        if self.rng.random_bool(p) {
            Some(&ERROR_TEMPLATES[self.rng.random_range(0..ERROR_TEMPLATES.len())])
        } else {
            None
        }
    }

    fn make_widget(&mut self, id: String, position: Point) -> Widget {
        self.created += 1;
        let content = CONTENT[self.rng.random_range(0..CONTENT.len())];
        Widget::new(id, format!("Widget {}", self.created), content, position)
    }

    fn fresh_id(&mut self) -> String {
        uuid::Builder::from_random_bytes(self.rng.random())
            .into_uuid()
            .to_string()
    }

    fn settle<T: Serialize>(
        params: RequestParams,
        now: u64,
        delay_ms: u64,
        outcome: Result<T, &ErrorTemplate>,
    ) -> Pending<T> {
        let ready_at = now.saturating_add(delay_ms);
        match outcome {
            Ok(value) => {
                record::request_succeeded(&params, delay_ms, &value);
                Pending::deferred(ready_at, Ok(value))
            }
            Err(template) => {
                let error = simulated_error(template, params, delay_ms);
                record::request_failed(&error.request, delay_ms, &error);
                Pending::deferred(ready_at, Err(error))
            }
        }
    }
}

impl WidgetBackend for MockNetwork {
    fn fetch_one(&mut self, id: &str, now: u64) -> Pending<Widget> {
        let params = RequestParams::FetchOne { id: id.to_owned() };
        let delay = self.config.fetch_one_delay.sample(&mut self.rng);
        let spread = self.config.fetch_one_spread.abs();
        let outcome = if !is_sampleable(spread) {
            Err(&ERROR_TEMPLATES[INVALID_PARAMS])
        } else if let Some(template) = self.roll_failure() {
            Err(template)
        } else {
            let position = Point::new(
                self.rng.random_range(-spread..=spread),
                self.rng.random_range(-spread..=spread),
            );
            Ok(self.make_widget(id.to_owned(), position))
        };
        Self::settle(params, now, delay, outcome)
    }

    fn fetch_batch(&mut self, request: BatchRequest, now: u64) -> Pending<Vec<Widget>> {
        let params = RequestParams::from(&request);
        let delay = self.config.fetch_batch_delay.sample(&mut self.rng);
        let radius = self.config.spawn_radius.abs() / request.zoom;
        let valid = request.zoom > 0.0 && is_sampleable(radius) && request.center.is_finite();
        let outcome = if !valid {
            Err(&ERROR_TEMPLATES[INVALID_PARAMS])
        } else if let Some(template) = self.roll_failure() {
            Err(template)
        } else {
            let widgets = (0..request.count)
                .map(|_| {
                    let offset_x = self.rng.random_range(-radius..=radius);
                    let offset_y = self.rng.random_range(-radius..=radius);
                    let id = self.fresh_id();
                    self.make_widget(
                        id,
                        Point::new(request.center.x + offset_x, request.center.y + offset_y),
                    )
                })
                .collect();
            Ok(widgets)
        };
        Self::settle(params, now, delay, outcome)
    }
}

/// `true` if `-half..=half` has a finite width and can be sampled.
fn is_sampleable(half: f64) -> bool {
    (2.0 * half).is_finite()
}

fn simulated_error(template: &ErrorTemplate, request: RequestParams, delay_ms: u64) -> SimulatedError {
    let method = request.method();
    let stack_trace = format!(
        "{kind}: {message}\n    at MockNetwork::{method} (expanse_mock_net/src/mock.rs)\n    at <dyn WidgetBackend>::{method}\n    at settle after {delay_ms}ms",
        kind = template.kind,
        message = template.message,
    );
    SimulatedError {
        message: template.message.to_owned(),
        kind: template.kind,
        status: template.status,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        request,
        stack_trace,
    }
}
