// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::widget::Widget;

/// Describes an effective change to a [`WidgetStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreChange {
    /// Contents replaced by a bulk load.
    Loaded {
        /// Number of widgets after the load.
        count: usize,
    },
    /// Widgets appended by a merge.
    Appended {
        /// Number of widgets appended.
        count: usize,
    },
    /// All widgets removed.
    Reset,
}

/// Handle returned by [`WidgetStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&StoreChange)>;

/// Insertion‑ordered widget collection, deduplicated by id at merge time.
pub struct WidgetStore {
    widgets: Arc<Vec<Widget>>,
    // id -> index of its first occurrence.
    index: HashMap<String, usize>,
    revision: u64,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl fmt::Debug for WidgetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetStore")
            .field("len", &self.widgets.len())
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for WidgetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            widgets: Arc::new(Vec::new()),
            index: HashMap::new(),
            revision: 0,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Number of stored widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns `true` if the store holds no widgets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Revision counter; bumps once per effective change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Widgets in insertion order.
    #[must_use]
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    /// Iterates over the widgets in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, Widget> {
        self.widgets.iter()
    }

    /// Shared snapshot of the contents.
    ///
    /// The returned `Arc` is pointer‑identical across calls until the
    /// contents change.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Widget>> {
        Arc::clone(&self.widgets)
    }

    /// Looks up a widget by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Widget> {
        self.index.get(id).map(|&i| &self.widgets[i])
    }

    /// Returns `true` if a widget with `id` is present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Replaces the contents with `batch`, in order.
    ///
    /// This is the initial bulk load: ids are not checked against each other.
    pub fn load(&mut self, batch: Vec<Widget>) {
        self.index.clear();
        for (i, w) in batch.iter().enumerate() {
            self.index.entry(String::from(w.id())).or_insert(i);
        }
        let count = batch.len();
        self.widgets = Arc::new(batch);
        self.commit(StoreChange::Loaded { count });
    }

    /// Appends the widgets of `batch` whose id is not yet present.
    ///
    /// Fetch order is preserved and repeated ids inside `batch` keep only
    /// their first occurrence. Returns the number of widgets appended; when it
    /// is zero the store, its snapshot and its revision are untouched and no
    /// listener runs.
    pub fn merge(&mut self, batch: impl IntoIterator<Item = Widget>) -> usize {
        let mut fresh = Vec::new();
        for widget in batch {
            if self.index.contains_key(widget.id()) {
                continue;
            }
            let at = self.widgets.len() + fresh.len();
            self.index.insert(String::from(widget.id()), at);
            fresh.push(widget);
        }
        if fresh.is_empty() {
            return 0;
        }

        let count = fresh.len();
        // Clones only if a snapshot is still held elsewhere.
        Arc::make_mut(&mut self.widgets).extend(fresh);
        self.commit(StoreChange::Appended { count });
        count
    }

    /// Removes every widget. A reset of an empty store is a no‑op.
    pub fn reset(&mut self) {
        if self.widgets.is_empty() {
            return;
        }
        self.widgets = Arc::new(Vec::new());
        self.index.clear();
        self.commit(StoreChange::Reset);
    }

    /// Registers a listener that runs after each effective change.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, change: StoreChange) {
        self.revision += 1;
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::Point;

    use super::{StoreChange, WidgetStore};
    use crate::Widget;

    fn w(id: &str) -> Widget {
        Widget::new(id, "title", "content", Point::new(1.0, 2.0))
    }

    fn ids(store: &WidgetStore) -> Vec<&str> {
        store.widgets().iter().map(Widget::id).collect()
    }

    #[test]
    fn empty_store_basics() {
        let store = WidgetStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.revision(), 0);
        assert!(store.get("a").is_none());
    }

    #[test]
    fn load_keeps_order_without_dedup() {
        let mut store = WidgetStore::new();
        store.load(vec![w("a"), w("b"), w("a")]);
        assert_eq!(ids(&store), ["a", "b", "a"]);
        assert_eq!(store.revision(), 1);
        assert!(store.contains("a"));
    }

    #[test]
    fn merge_appends_only_new_ids_in_fetch_order() {
        let mut store = WidgetStore::new();
        store.load(vec![w("a"), w("b")]);

        assert_eq!(store.merge(vec![w("c"), w("a"), w("d"), w("c")]), 2);
        assert_eq!(ids(&store), ["a", "b", "c", "d"]);
        assert_eq!(store.get("d").map(Widget::id), Some("d"));
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn merge_of_known_ids_is_identity() {
        let mut store = WidgetStore::new();
        store.load(vec![w("a"), w("b")]);
        let snapshot = store.snapshot();
        let revision = store.revision();

        assert_eq!(store.merge(vec![w("a"), w("b")]), 0);
        assert_eq!(store.merge(Vec::new()), 0);
        assert!(alloc::sync::Arc::ptr_eq(&snapshot, &store.snapshot()));
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn held_snapshot_is_not_mutated() {
        let mut store = WidgetStore::new();
        store.load(vec![w("a")]);
        let old = store.snapshot();

        store.merge(vec![w("b")]);
        assert_eq!(old.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn listeners_see_effective_changes_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = WidgetStore::new();
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |c| sink.borrow_mut().push(*c));

        store.load(vec![w("a")]);
        store.merge(vec![w("a")]);
        store.merge(vec![w("b"), w("c")]);
        store.reset();
        store.reset();

        assert_eq!(
            *seen.borrow(),
            [
                StoreChange::Loaded { count: 1 },
                StoreChange::Appended { count: 2 },
                StoreChange::Reset,
            ]
        );

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.load(vec![w("z")]);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn reset_clears_ids() {
        let mut store = WidgetStore::new();
        store.load(vec![w("a")]);
        store.reset();
        assert!(store.is_empty());
        assert!(!store.contains("a"));
        assert_eq!(store.merge(vec![w("a")]), 1);
    }
}
