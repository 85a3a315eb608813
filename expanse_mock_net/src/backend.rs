// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use expanse_store::Widget;

use crate::pending::Pending;
use crate::request::BatchRequest;

/// Source of widgets for a canvas.
///
/// Both methods return immediately; the outcome arrives through the returned
/// [`Pending`]. `now` is the host time in milliseconds at which the request
/// is issued; backends that complete out of band may ignore it.
pub trait WidgetBackend {
    /// Requests the widget with `id`.
    fn fetch_one(&mut self, id: &str, now: u64) -> Pending<Widget>;

    /// Requests `request.count` widgets around `request.center`.
    fn fetch_batch(&mut self, request: BatchRequest, now: u64) -> Pending<Vec<Widget>>;
}

impl<B: WidgetBackend + ?Sized> WidgetBackend for &mut B {
    fn fetch_one(&mut self, id: &str, now: u64) -> Pending<Widget> {
        (**self).fetch_one(id, now)
    }

    fn fetch_batch(&mut self, request: BatchRequest, now: u64) -> Pending<Vec<Widget>> {
        (**self).fetch_batch(request, now)
    }
}

impl<B: WidgetBackend + ?Sized> WidgetBackend for Box<B> {
    fn fetch_one(&mut self, id: &str, now: u64) -> Pending<Widget> {
        (**self).fetch_one(id, now)
    }

    fn fetch_batch(&mut self, request: BatchRequest, now: u64) -> Pending<Vec<Widget>> {
        (**self).fetch_batch(request, now)
    }
}
