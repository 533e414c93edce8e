// ── Reactive resource store ──
//
// Ordered entity storage with push-based change notification.

mod collection;

pub use collection::ResourceCollection;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{Comparison, Contract, EntityId, Notification, SecurityRule};
use crate::stream::EntityStream;

/// Central reactive store for all console entities.
///
/// One ordered collection per resource family. Mutations flow in
/// through the per-resource `ResourceSync` coordinators and are
/// broadcast to subscribers via `watch` channels.
pub struct ConsoleStore {
    pub(crate) notifications: Arc<ResourceCollection<Notification>>,
    pub(crate) contracts: Arc<ResourceCollection<Contract>>,
    pub(crate) security_rules: Arc<ResourceCollection<SecurityRule>>,
    pub(crate) comparisons: Arc<ResourceCollection<Comparison>>,
    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl ConsoleStore {
    pub fn new() -> Self {
        let (last_refresh, _) = watch::channel(None);

        Self {
            notifications: Arc::new(ResourceCollection::new()),
            contracts: Arc::new(ResourceCollection::new()),
            security_rules: Arc::new(ResourceCollection::new()),
            comparisons: Arc::new(ResourceCollection::new()),
            last_refresh,
        }
    }

    // ── Collection accessors ─────────────────────────────────────────

    pub fn notifications(&self) -> &Arc<ResourceCollection<Notification>> {
        &self.notifications
    }

    pub fn contracts(&self) -> &Arc<ResourceCollection<Contract>> {
        &self.contracts
    }

    pub fn security_rules(&self) -> &Arc<ResourceCollection<SecurityRule>> {
        &self.security_rules
    }

    pub fn comparisons(&self) -> &Arc<ResourceCollection<Comparison>> {
        &self.comparisons
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn notifications_snapshot(&self) -> Arc<Vec<Arc<Notification>>> {
        self.notifications.snapshot()
    }

    pub fn contracts_snapshot(&self) -> Arc<Vec<Arc<Contract>>> {
        self.contracts.snapshot()
    }

    pub fn security_rules_snapshot(&self) -> Arc<Vec<Arc<SecurityRule>>> {
        self.security_rules.snapshot()
    }

    pub fn comparisons_snapshot(&self) -> Arc<Vec<Arc<Comparison>>> {
        self.comparisons.snapshot()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn notification_by_id(&self, id: &EntityId) -> Option<Arc<Notification>> {
        self.notifications.get(id)
    }

    pub fn contract_by_id(&self, id: &EntityId) -> Option<Arc<Contract>> {
        self.contracts.get(id)
    }

    pub fn security_rule_by_id(&self, id: &EntityId) -> Option<Arc<SecurityRule>> {
        self.security_rules.get(id)
    }

    pub fn comparison_by_id(&self, id: &EntityId) -> Option<Arc<Comparison>> {
        self.comparisons.get(id)
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }

    pub fn contract_count(&self) -> usize {
        self.contracts.len()
    }

    pub fn security_rule_count(&self) -> usize {
        self.security_rules.len()
    }

    pub fn comparison_count(&self) -> usize {
        self.comparisons.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_notifications(&self) -> EntityStream<Notification> {
        self.notifications.stream()
    }

    pub fn subscribe_contracts(&self) -> EntityStream<Contract> {
        self.contracts.stream()
    }

    pub fn subscribe_security_rules(&self) -> EntityStream<SecurityRule> {
        self.security_rules.stream()
    }

    pub fn subscribe_comparisons(&self) -> EntityStream<Comparison> {
        self.comparisons.stream()
    }

    // ── Refresh bookkeeping ──────────────────────────────────────────

    pub(crate) fn mark_refreshed(&self) {
        self.last_refresh.send_modify(|t| *t = Some(Utc::now()));
    }

    /// When the last successful full refresh completed, if any.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    pub fn subscribe_last_refresh(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_refresh.subscribe()
    }

    /// Drop all cached entities (used on disconnect).
    pub(crate) fn clear(&self) {
        self.notifications.clear();
        self.contracts.clear();
        self.security_rules.clear();
        self.comparisons.clear();
        self.last_refresh.send_modify(|t| *t = None);
    }
}

impl Default for ConsoleStore {
    fn default() -> Self {
        Self::new()
    }
}
