// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-deferred request completions.

use std::task::Poll;

use futures::channel::oneshot;

use crate::error::{FetchError, SimulatedError};

type Outcome<T> = Result<T, SimulatedError>;

/// A request that completes at some later host time.
///
/// A completion is either *deferred* (its outcome is known up front and
/// becomes visible once the host clock reaches `ready_at`) or *channelled*
/// (another party sends the outcome through a [`Completer`]). Both are polled
/// the same way. Once [`Pending::poll`] has returned `Ready`, further polls
/// return `Pending`.
#[derive(Debug)]
pub struct Pending<T> {
    state: State<T>,
}

#[derive(Debug)]
enum State<T> {
    Deferred { ready_at: u64, outcome: Outcome<T> },
    Channel(oneshot::Receiver<Outcome<T>>),
    Done,
}

impl<T> Pending<T> {
    /// A completion whose outcome becomes visible at `ready_at` (milliseconds).
    #[must_use]
    pub fn deferred(ready_at: u64, outcome: Result<T, SimulatedError>) -> Self {
        Self {
            state: State::Deferred { ready_at, outcome },
        }
    }

    /// A channelled completion and the handle that fulfils it.
    ///
    /// Dropping the [`Completer`] without completing makes the request fail
    /// with [`FetchError::Disconnected`].
    #[must_use]
    pub fn channel() -> (Completer<T>, Self) {
        let (tx, rx) = oneshot::channel();
        (
            Completer { tx },
            Self {
                state: State::Channel(rx),
            },
        )
    }

    /// Time at which a deferred completion becomes ready.
    ///
    /// `None` for channelled or already delivered completions.
    #[must_use]
    pub fn ready_at(&self) -> Option<u64> {
        match &self.state {
            State::Deferred { ready_at, .. } => Some(*ready_at),
            State::Channel(_) | State::Done => None,
        }
    }

    /// Returns `true` once the outcome has been delivered.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Done)
    }

    /// Polls for the outcome at host time `now`.
    pub fn poll(&mut self, now: u64) -> Poll<Result<T, FetchError>> {
        match std::mem::replace(&mut self.state, State::Done) {
            State::Deferred { ready_at, outcome } => {
                if ready_at > now {
                    self.state = State::Deferred { ready_at, outcome };
                    Poll::Pending
                } else {
                    Poll::Ready(outcome.map_err(FetchError::from))
                }
            }
            State::Channel(mut rx) => match rx.try_recv() {
                Ok(None) => {
                    self.state = State::Channel(rx);
                    Poll::Pending
                }
                Ok(Some(outcome)) => Poll::Ready(outcome.map_err(FetchError::from)),
                Err(oneshot::Canceled) => Poll::Ready(Err(FetchError::Disconnected)),
            },
            State::Done => Poll::Pending,
        }
    }
}

/// Sending half of a channelled [`Pending`].
#[derive(Debug)]
pub struct Completer<T> {
    tx: oneshot::Sender<Outcome<T>>,
}

impl<T> Completer<T> {
    /// Delivers the outcome. Returns `false` if the request was dropped.
    pub fn complete(self, outcome: Result<T, SimulatedError>) -> bool {
        self.tx.send(outcome).is_ok()
    }
}
