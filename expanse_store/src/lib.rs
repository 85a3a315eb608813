// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Store: the widget collection behind an infinite canvas.
//!
//! The store keeps [`Widget`] records in insertion order and only ever grows
//! during normal use. Batches arriving from the network are merged by id:
//! widgets whose id is already present are dropped, the rest are appended in
//! fetch order.
//!
//! Readers take a cheap [`WidgetStore::snapshot`], an `Arc` that stays
//! pointer‑identical until the contents actually change. A merge that adds
//! nothing leaves the snapshot, the revision counter and the listeners alone,
//! which lets reactive renderers skip work by comparing pointers or
//! revisions.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kurbo::Point;
//! use expanse_store::{StoreChange, Widget, WidgetStore};
//!
//! let w = |id: &str| Widget::new(id, "Title", "Body", Point::new(0.0, 0.0));
//!
//! let mut store = WidgetStore::new();
//! store.load(vec![w("a"), w("b")]);
//!
//! let before = store.snapshot();
//! assert_eq!(store.merge(vec![w("b")]), 0);
//! assert!(Arc::ptr_eq(&before, &store.snapshot()));
//!
//! let id = store.subscribe(|change| assert_eq!(*change, StoreChange::Appended { count: 1 }));
//! assert_eq!(store.merge(vec![w("b"), w("c")]), 1);
//! assert_eq!(store.len(), 3);
//! assert!(store.unsubscribe(id));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod store;
mod widget;

pub use store::{ListenerId, StoreChange, WidgetStore};
pub use widget::Widget;
