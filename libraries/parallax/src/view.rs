//! # LiveView
//! The canonical in-memory state for one open session: an ordered,
//! deduplicated sequence of records. Everything the presentation shows is a
//! read-only projection of this.
//!
//! Three sources feed it - the session's own optimistic mutations, change
//! events pushed from the store, and store create responses - and any of them
//! may redeliver something another source already applied. So every
//! transition is idempotent: re-inserting a present id and deleting an absent
//! id both change nothing.

use im::Vector;
use slotmap::{SlotMap, new_key_type};

use crate::model::Keyed;

new_key_type! {
    /// Handle for a registered change listener.
    pub struct ListenerKey;
}

type Listener<R> = Box<dyn FnMut(&Vector<R>)>;

/// An ordered, deduplicated view of one owner's records.
///
/// Ordering invariant: `created_at` descending, ties keeping arrival order.
/// Uniqueness invariant: no two entries share an id.
pub struct LiveView<R: Keyed + Clone> {
    entries: Vector<R>,
    listeners: SlotMap<ListenerKey, Listener<R>>,
}

impl<R: Keyed + Clone> Default for LiveView<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Keyed + Clone> LiveView<R> {
    pub fn new() -> Self {
        LiveView {
            entries: Vector::new(),
            listeners: SlotMap::with_key(),
        }
    }

    /// Load an initial batch (e.g. the store's list response) through the
    /// normal insert path, so duplicates and ordering are handled the same
    /// way as live events.
    pub fn seed(&mut self, records: impl IntoIterator<Item = R>) {
        let mut changed = false;
        for record in records {
            changed |= self.insert(record);
        }
        if changed {
            self.notify();
        }
    }

    /// Apply a remotely-originated insert. Returns whether the view changed.
    ///
    /// If the id is already present (typically because this session inserted
    /// it optimistically and the event is a duplicate delivery), nothing
    /// happens.
    pub fn apply_insert(&mut self, record: R) -> bool {
        let changed = self.insert(record);
        if changed {
            self.notify();
        }
        changed
    }

    /// Apply a remotely-originated delete. Returns whether the view changed.
    ///
    /// An absent id is a no-op: the session may have removed the record
    /// optimistically already, or never have seen it at all.
    pub fn apply_delete(&mut self, id: &R::Id) -> bool {
        let changed = self.remove(id);
        if changed {
            self.notify();
        }
        changed
    }

    /// Insert a record the local session just created.
    ///
    /// Same transition as [`apply_insert`](Self::apply_insert) - optimism is
    /// where the record came from, not a different kind of state change.
    /// Keeping the semantics identical is what makes a later duplicate
    /// delivery from the channel safe to apply.
    pub fn apply_optimistic_insert(&mut self, record: R) -> bool {
        self.apply_insert(record)
    }

    /// Remove a record the local session is deleting, without waiting for
    /// the store to confirm. Same transition as
    /// [`apply_delete`](Self::apply_delete).
    pub fn apply_optimistic_remove(&mut self, id: &R::Id) -> bool {
        self.apply_delete(id)
    }

    pub fn contains(&self, id: &R::Id) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.entries.iter()
    }

    /// A cheap clone of the current entries, newest first.
    pub fn snapshot(&self) -> Vector<R> {
        self.entries.clone()
    }

    /// Register a callback invoked with the new snapshot after every
    /// transition that actually changes the view.
    pub fn on_change(&mut self, listener: impl FnMut(&Vector<R>) + 'static) -> ListenerKey {
        self.listeners.insert(Box::new(listener))
    }

    pub fn remove_listener(&mut self, key: ListenerKey) {
        self.listeners.remove(key);
    }

    fn insert(&mut self, record: R) -> bool {
        if self.contains(record.id()) {
            log::debug!("Skipping insert of already-present record {:?}", record.id());
            return false;
        }

        // Entries are newest-first. Skip past everything at least as new as
        // the incoming record; equal timestamps keep arrival order, so the
        // newcomer goes after them. A late delivery of an older record lands
        // in the middle, not at the head.
        let position = self
            .entries
            .iter()
            .position(|entry| entry.created_at() < record.created_at())
            .unwrap_or(self.entries.len());
        self.entries.insert(position, record);
        true
    }

    fn remove(&mut self, id: &R::Id) -> bool {
        let Some(position) = self.entries.iter().position(|entry| entry.id() == id) else {
            log::debug!("Skipping delete of absent record {id:?}");
            return false;
        };
        self.entries.remove(position);
        true
    }

    fn notify(&mut self) {
        for listener in self.listeners.values_mut() {
            listener(&self.entries);
        }
    }
}
