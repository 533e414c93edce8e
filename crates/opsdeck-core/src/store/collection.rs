// ── Generic reactive resource collection ──
//
// Insertion-ordered storage with unique-by-id entries and push-based
// change notification via `watch` channels. Mutation and snapshot
// publication happen under one lock, so subscribers always observe
// snapshots in mutation order.

use std::sync::{Arc, Mutex, PoisonError};

use indexmap::IndexMap;
use tokio::sync::watch;

use crate::model::{Entity, EntityId};
use crate::stream::EntityStream;

/// An ordered, reactive collection for a single entity type.
///
/// Entries keep the order they were first inserted in; updating an
/// existing id keeps its position, removal closes the gap. Every
/// mutation bumps a version counter and publishes a fresh snapshot
/// that subscribers receive through `watch` channels.
pub struct ResourceCollection<T: Entity> {
    /// Primary storage: id -> entity, in insertion order.
    entries: Mutex<IndexMap<EntityId, Arc<T>>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full ordered snapshot, republished on every mutation.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Entity> ResourceCollection<T> {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            entries: Mutex::new(IndexMap::new()),
            version,
            snapshot,
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Replace the whole collection with `entities`, keeping their order.
    pub(crate) fn replace(&self, entities: Vec<T>) {
        self.mutate(|entries| {
            entries.clear();
            for entity in entities {
                entries.insert(entity.id().clone(), Arc::new(entity));
            }
        });
    }

    /// Insert or update an entity. Updates keep the entry's position;
    /// inserts append. Returns the stored `Arc`.
    pub(crate) fn upsert(&self, entity: T) -> Arc<T> {
        self.mutate(|entries| {
            let arc = Arc::new(entity);
            entries.insert(arc.id().clone(), Arc::clone(&arc));
            arc
        })
    }

    /// Replace the entry stored under `old_id` with `entity`, keeping
    /// the entry's position. Used when a provisional id is superseded
    /// by the server-assigned one. Falls back to a plain upsert when
    /// `old_id` is no longer present.
    pub(crate) fn replace_entry(&self, old_id: &EntityId, entity: T) -> Arc<T> {
        self.mutate(|entries| {
            let new_id = entity.id().clone();
            let arc = Arc::new(entity);
            if new_id != *old_id {
                if let Some(index) = entries.get_index_of(old_id) {
                    entries.shift_remove(old_id);
                    entries.shift_insert(index, new_id, Arc::clone(&arc));
                    return arc;
                }
            }
            entries.insert(new_id, Arc::clone(&arc));
            arc
        })
    }

    /// Replace the stored copy of an entity, but only if its id is
    /// still present. A concurrent remove wins: folding in a finished
    /// update never resurrects a deleted entry. Returns the entity
    /// (stored or not) behind an `Arc`.
    pub(crate) fn reconcile(&self, entity: T) -> Arc<T> {
        self.mutate(|entries| {
            let arc = Arc::new(entity);
            if let Some(slot) = entries.get_mut(arc.id()) {
                *slot = Arc::clone(&arc);
            }
            arc
        })
    }

    /// Remove an entity by id, closing the gap in the order.
    /// Returns the removed entity if it existed.
    pub(crate) fn remove(&self, id: &EntityId) -> Option<Arc<T>> {
        self.mutate(|entries| entries.shift_remove(id))
    }

    /// Restore a previously captured snapshot verbatim (same `Arc`s,
    /// same order). This is the rollback path for failed mutations.
    pub(crate) fn restore(&self, snapshot: &Arc<Vec<Arc<T>>>) {
        self.mutate(|entries| {
            entries.clear();
            for entity in snapshot.iter() {
                entries.insert(entity.id().clone(), Arc::clone(entity));
            }
        });
    }

    /// Remove all entities.
    pub(crate) fn clear(&self) {
        self.mutate(IndexMap::clear);
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Look up an entity by id.
    pub fn get(&self, id: &EntityId) -> Option<Arc<T>> {
        self.read(|entries| entries.get(id).map(Arc::clone))
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.read(|entries| entries.contains_key(id))
    }

    pub fn len(&self) -> usize {
        self.read(IndexMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(IndexMap::is_empty)
    }

    /// Get the current ordered snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    /// Current mutation count. Useful for change detection in tests
    /// and cache invalidation.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Reactive stream over snapshot changes.
    pub fn stream(&self) -> EntityStream<T> {
        EntityStream::new(self.snapshot.subscribe())
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Apply `f` to the entries, then publish snapshot and version
    /// while still holding the lock. Serializing publication with the
    /// mutation keeps subscribers from seeing reordered snapshots.
    fn mutate<R>(&self, f: impl FnOnce(&mut IndexMap<EntityId, Arc<T>>) -> R) -> R {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut entries);

        let values: Vec<Arc<T>> = entries.values().map(Arc::clone).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);

        out
    }

    fn read<R>(&self, f: impl FnOnce(&IndexMap<EntityId, Arc<T>>) -> R) -> R {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        f(&entries)
    }
}

impl<T: Entity> Default for ResourceCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Ticket {
        id: EntityId,
        label: String,
    }

    impl Entity for Ticket {
        fn id(&self) -> &EntityId {
            &self.id
        }
    }

    fn ticket(id: &str, label: &str) -> Ticket {
        Ticket {
            id: EntityId::from(id),
            label: label.to_owned(),
        }
    }

    fn labels(col: &ResourceCollection<Ticket>) -> Vec<String> {
        col.snapshot().iter().map(|t| t.label.clone()).collect()
    }

    #[test]
    fn upsert_keeps_ids_unique() {
        let col = ResourceCollection::new();
        col.upsert(ticket("1", "a"));
        let stored = col.upsert(ticket("1", "b"));
        assert_eq!(col.len(), 1);
        assert_eq!(stored.label, "b");
        assert!(Arc::ptr_eq(&stored, &col.get(&EntityId::from("1")).unwrap()));
    }

    #[test]
    fn updates_keep_position_inserts_append() {
        let col = ResourceCollection::new();
        col.upsert(ticket("1", "a"));
        col.upsert(ticket("2", "b"));
        col.upsert(ticket("3", "c"));

        col.upsert(ticket("2", "b2"));
        assert_eq!(labels(&col), ["a", "b2", "c"]);

        col.upsert(ticket("4", "d"));
        assert_eq!(labels(&col), ["a", "b2", "c", "d"]);
    }

    #[test]
    fn remove_closes_the_gap() {
        let col = ResourceCollection::new();
        col.upsert(ticket("1", "a"));
        col.upsert(ticket("2", "b"));
        col.upsert(ticket("3", "c"));

        let removed = col.remove(&EntityId::from("2")).unwrap();
        assert_eq!(removed.label, "b");
        assert_eq!(labels(&col), ["a", "c"]);
        assert!(col.remove(&EntityId::from("2")).is_none());
    }

    #[test]
    fn replace_swaps_contents_and_order() {
        let col = ResourceCollection::new();
        col.upsert(ticket("1", "a"));

        col.replace(vec![ticket("9", "z"), ticket("8", "y")]);
        assert_eq!(labels(&col), ["z", "y"]);
        assert!(col.get(&EntityId::from("1")).is_none());
    }

    #[test]
    fn replace_entry_keeps_position() {
        let col = ResourceCollection::new();
        col.upsert(ticket("1", "a"));
        col.upsert(ticket("tmp-1", "pending"));
        col.upsert(ticket("3", "c"));

        col.replace_entry(&EntityId::from("tmp-1"), ticket("42", "confirmed"));

        assert_eq!(labels(&col), ["a", "confirmed", "c"]);
        assert!(col.get(&EntityId::from("tmp-1")).is_none());
        assert!(col.get(&EntityId::from("42")).is_some());
    }

    #[test]
    fn replace_entry_is_idempotent_when_old_id_is_gone() {
        let col = ResourceCollection::new();
        col.upsert(ticket("1", "a"));
        col.replace_entry(&EntityId::from("tmp-1"), ticket("42", "confirmed"));
        col.replace_entry(&EntityId::from("tmp-1"), ticket("42", "confirmed"));

        assert_eq!(labels(&col), ["a", "confirmed"]);
        assert_eq!(col.len(), 2);
    }

    #[test]
    fn reconcile_replaces_in_position() {
        let col = ResourceCollection::new();
        col.upsert(ticket("1", "a"));
        col.upsert(ticket("2", "b"));
        col.upsert(ticket("3", "c"));

        col.reconcile(ticket("2", "b-server"));
        assert_eq!(labels(&col), ["a", "b-server", "c"]);
    }

    #[test]
    fn reconcile_never_resurrects_removed_ids() {
        let col = ResourceCollection::new();
        col.upsert(ticket("1", "a"));
        col.remove(&EntityId::from("1"));

        let returned = col.reconcile(ticket("1", "a-server"));
        assert_eq!(returned.label, "a-server");
        assert!(col.is_empty());
    }

    #[test]
    fn restore_round_trips_exactly() {
        let col = ResourceCollection::new();
        col.upsert(ticket("1", "a"));
        col.upsert(ticket("2", "b"));
        let before = col.snapshot();

        col.remove(&EntityId::from("1"));
        col.upsert(ticket("3", "c"));
        assert_ne!(labels(&col), ["a", "b"]);

        col.restore(&before);
        let after = col.snapshot();
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after.iter()) {
            assert!(Arc::ptr_eq(b, a));
        }
    }

    #[test]
    fn version_bumps_on_every_mutation() {
        let col = ResourceCollection::new();
        let v0 = col.version();
        col.upsert(ticket("1", "a"));
        col.remove(&EntityId::from("1"));
        col.clear();
        assert_eq!(col.version(), v0 + 3);
    }

    #[test]
    fn snapshot_subscription_sees_changes() {
        let col = ResourceCollection::new();
        let mut rx = col.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        col.upsert(ticket("1", "a"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
