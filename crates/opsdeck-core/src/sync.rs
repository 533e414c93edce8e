// ── Optimistic mutation coordinator ──
//
// One ResourceSync per resource family: a thin protocol layer between
// a typed endpoint client and the shared collection. Every mutation
// follows the same protocol:
//
//   1. snapshot the collection
//   2. apply the change locally (optimistic)
//   3. dispatch the request
//   4. on success, reconcile the local entry with the server's copy;
//      on failure, restore the pre-mutation snapshot and surface the error
//
// Overlapping mutations against the same id settle in completion
// order; the server's reply is always the authority.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{Entity, EntityId};
use crate::store::ResourceCollection;

// ── Load state ───────────────────────────────────────────────────────

/// Lifecycle of a collection's initial load.
///
/// A failed load is distinguishable from an empty collection: consumers
/// render `Failed` as an error state, never as "no items".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

// ── Pending operations ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Toggle,
    Remove,
}

/// An in-flight mutation, tracked from optimistic apply until the
/// server's reply settles it (either way).
#[derive(Debug, Clone)]
pub struct PendingOperation {
    pub seq: u64,
    pub kind: MutationKind,
    pub entity_id: EntityId,
    pub started_at: DateTime<Utc>,
}

/// Removes its operation from the pending list on drop, so cancelled
/// (dropped) mutation futures never leave stale entries behind.
struct PendingGuard<'a> {
    pending: &'a Mutex<Vec<PendingOperation>>,
    seq: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|op| op.seq != self.seq);
    }
}

// ── Payload traits ───────────────────────────────────────────────────

/// Build the optimistic placeholder entity for a create payload.
///
/// The placeholder carries a provisional id and is swapped for the
/// server's copy on reconciliation.
pub trait ProvisionalSeed<T> {
    fn provisional(&self, id: EntityId) -> T;
}

/// Apply a mutation payload on top of the current entity, producing
/// the optimistic version shown until the server replies.
pub trait EntityPatch<T> {
    fn apply_to(&self, current: &T) -> T;
}

// ── Endpoint client trait ────────────────────────────────────────────

/// Typed endpoint family for one resource.
///
/// Resources that don't support an operation use [`Never`]
/// (`crate::resources::Never`) for that payload type, which removes
/// the operation at compile time.
pub trait ResourceClient: Send + Sync + 'static {
    type Entity: Entity;
    type Create: ProvisionalSeed<Self::Entity> + Send + Sync;
    type Update: EntityPatch<Self::Entity> + Send + Sync;
    type Toggle: EntityPatch<Self::Entity> + Send + Sync;

    /// Singular noun used in errors and log lines.
    const RESOURCE: &'static str;

    fn load(&self) -> impl Future<Output = Result<Vec<Self::Entity>, CoreError>> + Send;

    fn create(
        &self,
        payload: &Self::Create,
    ) -> impl Future<Output = Result<Self::Entity, CoreError>> + Send;

    fn update(
        &self,
        id: &EntityId,
        payload: &Self::Update,
    ) -> impl Future<Output = Result<Self::Entity, CoreError>> + Send;

    fn toggle(
        &self,
        id: &EntityId,
        payload: &Self::Toggle,
    ) -> impl Future<Output = Result<Self::Entity, CoreError>> + Send;

    fn remove(&self, id: &EntityId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

// ── Coordinator ──────────────────────────────────────────────────────

/// Synchronizes one resource family between the console API and the
/// local collection, applying mutations optimistically.
pub struct ResourceSync<C: ResourceClient> {
    client: C,
    collection: Arc<ResourceCollection<C::Entity>>,
    load_state: watch::Sender<LoadState>,
    pending: Mutex<Vec<PendingOperation>>,
    op_seq: AtomicU64,
    temp_seq: AtomicU64,
}

impl<C: ResourceClient> ResourceSync<C> {
    pub fn new(client: C, collection: Arc<ResourceCollection<C::Entity>>) -> Self {
        let (load_state, _) = watch::channel(LoadState::default());

        Self {
            client,
            collection,
            load_state,
            pending: Mutex::new(Vec::new()),
            op_seq: AtomicU64::new(0),
            // Start at 1 so the first placeholder reads `tmp-1`.
            temp_seq: AtomicU64::new(1),
        }
    }

    // ── Load ─────────────────────────────────────────────────────────

    /// Fetch the full collection from the server and replace the local
    /// copy. On failure the previous contents are kept: stale data
    /// plus `LoadState::Failed` beats an empty screen, except on the
    /// first load where there is nothing to keep.
    pub async fn load(&self) -> Result<(), CoreError> {
        let had_data = self.load_state.borrow().is_loaded();
        self.load_state.send_modify(|s| *s = LoadState::Loading);

        match self.client.load().await {
            Ok(entities) => {
                debug!(resource = C::RESOURCE, count = entities.len(), "collection loaded");
                self.collection.replace(entities);
                self.load_state.send_modify(|s| *s = LoadState::Loaded);
                Ok(())
            }
            Err(e) => {
                warn!(resource = C::RESOURCE, error = %e, "collection load failed");
                self.load_state.send_modify(|s| {
                    *s = if had_data {
                        LoadState::Loaded
                    } else {
                        LoadState::Failed(e.to_string())
                    };
                });
                Err(e)
            }
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create an entity. A placeholder with a provisional `tmp-N` id
    /// appears immediately; reconciliation swaps it (in place) for the
    /// server's copy carrying the real id.
    pub async fn create(&self, payload: &C::Create) -> Result<Arc<C::Entity>, CoreError> {
        let before = self.collection.snapshot();
        let provisional_id = EntityId::provisional(self.temp_seq.fetch_add(1, Ordering::Relaxed));
        self.collection
            .upsert(payload.provisional(provisional_id.clone()));
        let _guard = self.track(MutationKind::Create, provisional_id.clone());

        match self.client.create(payload).await {
            Ok(entity) => {
                debug!(resource = C::RESOURCE, id = %entity.id(), "create confirmed");
                Ok(self.collection.replace_entry(&provisional_id, entity))
            }
            Err(e) => {
                warn!(resource = C::RESOURCE, error = %e, "create rejected, rolling back");
                self.collection.restore(&before);
                Err(e)
            }
        }
    }

    /// Update an entity in place. The patched version appears
    /// immediately; the server's copy replaces it on success.
    pub async fn update(&self, id: &EntityId, payload: &C::Update) -> Result<Arc<C::Entity>, CoreError> {
        let before = self.collection.snapshot();
        let current = self.collection.get(id).ok_or_else(|| not_found::<C>(id))?;
        self.collection.upsert(payload.apply_to(&current));
        let _guard = self.track(MutationKind::Update, id.clone());

        match self.client.update(id, payload).await {
            Ok(entity) => {
                debug!(resource = C::RESOURCE, %id, "update confirmed");
                // reconcile, not upsert: a remove that landed while this
                // request was in flight must stay removed.
                Ok(self.collection.reconcile(entity))
            }
            Err(e) => {
                warn!(resource = C::RESOURCE, %id, error = %e, "update rejected, rolling back");
                self.collection.restore(&before);
                Err(e)
            }
        }
    }

    /// Flip a single flag on an entity (mark read, enable/disable).
    /// Same protocol as [`ResourceSync::update`] with a narrower payload.
    pub async fn toggle(&self, id: &EntityId, payload: &C::Toggle) -> Result<Arc<C::Entity>, CoreError> {
        let before = self.collection.snapshot();
        let current = self.collection.get(id).ok_or_else(|| not_found::<C>(id))?;
        self.collection.upsert(payload.apply_to(&current));
        let _guard = self.track(MutationKind::Toggle, id.clone());

        match self.client.toggle(id, payload).await {
            Ok(entity) => {
                debug!(resource = C::RESOURCE, %id, "toggle confirmed");
                Ok(self.collection.reconcile(entity))
            }
            Err(e) => {
                warn!(resource = C::RESOURCE, %id, error = %e, "toggle rejected, rolling back");
                self.collection.restore(&before);
                Err(e)
            }
        }
    }

    /// Remove an entity. It disappears immediately; on failure the
    /// pre-removal snapshot comes back verbatim, order included.
    pub async fn remove(&self, id: &EntityId) -> Result<(), CoreError> {
        let before = self.collection.snapshot();
        if self.collection.remove(id).is_none() {
            return Err(not_found::<C>(id));
        }
        let _guard = self.track(MutationKind::Remove, id.clone());

        match self.client.remove(id).await {
            Ok(()) => {
                debug!(resource = C::RESOURCE, %id, "remove confirmed");
                Ok(())
            }
            Err(e) => {
                warn!(resource = C::RESOURCE, %id, error = %e, "remove rejected, rolling back");
                self.collection.restore(&before);
                Err(e)
            }
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn collection(&self) -> &Arc<ResourceCollection<C::Entity>> {
        &self.collection
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Mutations currently awaiting a server reply.
    pub fn pending(&self) -> Vec<PendingOperation> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_pending(&self) -> bool {
        !self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state.borrow().clone()
    }

    pub fn subscribe_load_state(&self) -> watch::Receiver<LoadState> {
        self.load_state.subscribe()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn track(&self, kind: MutationKind, entity_id: EntityId) -> PendingGuard<'_> {
        let seq = self.op_seq.fetch_add(1, Ordering::Relaxed);
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PendingOperation {
                seq,
                kind,
                entity_id,
                started_at: Utc::now(),
            });

        PendingGuard {
            pending: &self.pending,
            seq,
        }
    }
}

fn not_found<C: ResourceClient>(id: &EntityId) -> CoreError {
    CoreError::NotFound {
        entity_type: C::RESOURCE,
        identifier: id.to_string(),
    }
}
