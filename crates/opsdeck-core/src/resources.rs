// ── Typed endpoint clients and mutation payloads ──
//
// One ResourceClient impl per resource family, each wrapping the
// shared AdminClient. The associated payload types pin down which
// operations a family supports; unsupported ones use `Never` and
// disappear at compile time.

use std::sync::Arc;

use opsdeck_api::{AdminClient, types};

use crate::error::CoreError;
use crate::model::{
    Comparison, ComparisonStatus, Contract, ContractStatus, EntityId, Notification, SecurityRule,
};
use crate::sync::{EntityPatch, ProvisionalSeed, ResourceClient};

// ── Never ────────────────────────────────────────────────────────────

/// Payload type for operations a resource family does not support.
/// Uninhabited: the corresponding operation can never be invoked.
#[derive(Debug, Clone, Copy)]
pub enum Never {}

impl<T> ProvisionalSeed<T> for Never {
    fn provisional(&self, _id: EntityId) -> T {
        match *self {}
    }
}

impl<T> EntityPatch<T> for Never {
    fn apply_to(&self, _current: &T) -> T {
        match *self {}
    }
}

// ── Shared helper ────────────────────────────────────────────────────

/// Map a 404 onto the domain not-found error; everything else goes
/// through the standard conversion.
fn missing(err: opsdeck_api::Error, resource: &'static str, id: &EntityId) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            entity_type: resource,
            identifier: id.to_string(),
        }
    } else {
        err.into()
    }
}

// ── Notifications ────────────────────────────────────────────────────

/// Marks a notification as read. The only payload is the flag flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkRead;

impl EntityPatch<Notification> for MarkRead {
    fn apply_to(&self, current: &Notification) -> Notification {
        Notification {
            read: true,
            ..current.clone()
        }
    }
}

/// Notification endpoints: list, mark-read, delete.
pub struct NotificationApi {
    client: Arc<AdminClient>,
}

impl NotificationApi {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }
}

impl ResourceClient for NotificationApi {
    type Entity = Notification;
    type Create = Never;
    type Update = Never;
    type Toggle = MarkRead;

    const RESOURCE: &'static str = "notification";

    async fn load(&self) -> Result<Vec<Notification>, CoreError> {
        let wire = self.client.list_notifications().await?;
        Ok(wire.into_iter().map(Notification::from).collect())
    }

    async fn create(&self, payload: &Never) -> Result<Notification, CoreError> {
        match *payload {}
    }

    async fn update(&self, _id: &EntityId, payload: &Never) -> Result<Notification, CoreError> {
        match *payload {}
    }

    async fn toggle(&self, id: &EntityId, _payload: &MarkRead) -> Result<Notification, CoreError> {
        let wire = self
            .client
            .mark_notification_read(id.as_str())
            .await
            .map_err(|e| missing(e, Self::RESOURCE, id))?;
        Ok(wire.into())
    }

    async fn remove(&self, id: &EntityId) -> Result<(), CoreError> {
        self.client
            .delete_notification(id.as_str())
            .await
            .map_err(|e| missing(e, Self::RESOURCE, id))
    }
}

// ── Contracts ────────────────────────────────────────────────────────

/// Create/update payload for contracts. The same shape serves both:
/// the server expects the full document on either verb.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractPayload {
    pub name: String,
    pub partner: String,
    pub description: Option<String>,
    pub version: String,
    pub status: ContractStatus,
}

impl ContractPayload {
    fn to_wire(&self) -> types::ContractWriteRequest {
        types::ContractWriteRequest {
            name: self.name.clone(),
            partner: self.partner.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            status: self.status.to_string(),
        }
    }
}

impl ProvisionalSeed<Contract> for ContractPayload {
    fn provisional(&self, id: EntityId) -> Contract {
        Contract {
            id,
            name: self.name.clone(),
            partner: self.partner.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            status: self.status,
            updated_at: None,
            can_delete: true,
        }
    }
}

impl EntityPatch<Contract> for ContractPayload {
    fn apply_to(&self, current: &Contract) -> Contract {
        Contract {
            id: current.id.clone(),
            name: self.name.clone(),
            partner: self.partner.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            status: self.status,
            updated_at: current.updated_at,
            can_delete: current.can_delete,
        }
    }
}

/// Contract endpoints: full CRUD.
pub struct ContractApi {
    client: Arc<AdminClient>,
}

impl ContractApi {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }
}

impl ResourceClient for ContractApi {
    type Entity = Contract;
    type Create = ContractPayload;
    type Update = ContractPayload;
    type Toggle = Never;

    const RESOURCE: &'static str = "contract";

    async fn load(&self) -> Result<Vec<Contract>, CoreError> {
        let wire = self.client.list_contracts().await?;
        Ok(wire.into_iter().map(Contract::from).collect())
    }

    async fn create(&self, payload: &ContractPayload) -> Result<Contract, CoreError> {
        let wire = self.client.create_contract(&payload.to_wire()).await?;
        Ok(wire.into())
    }

    async fn update(&self, id: &EntityId, payload: &ContractPayload) -> Result<Contract, CoreError> {
        let wire = self
            .client
            .update_contract(id.as_str(), &payload.to_wire())
            .await
            .map_err(|e| missing(e, Self::RESOURCE, id))?;
        Ok(wire.into())
    }

    async fn toggle(&self, _id: &EntityId, payload: &Never) -> Result<Contract, CoreError> {
        match *payload {}
    }

    async fn remove(&self, id: &EntityId) -> Result<(), CoreError> {
        self.client
            .delete_contract(id.as_str())
            .await
            .map_err(|e| missing(e, Self::RESOURCE, id))
    }
}

// ── Security rules ───────────────────────────────────────────────────

/// Create/update payload for security rules.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityRulePayload {
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
}

impl SecurityRulePayload {
    fn to_wire(&self) -> types::SecurityRuleWriteRequest {
        types::SecurityRuleWriteRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            enabled: self.enabled,
        }
    }
}

impl ProvisionalSeed<SecurityRule> for SecurityRulePayload {
    fn provisional(&self, id: EntityId) -> SecurityRule {
        SecurityRule {
            id,
            name: self.name.clone(),
            description: self.description.clone(),
            enabled: self.enabled,
            builtin: false,
        }
    }
}

impl EntityPatch<SecurityRule> for SecurityRulePayload {
    fn apply_to(&self, current: &SecurityRule) -> SecurityRule {
        SecurityRule {
            id: current.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            enabled: self.enabled,
            builtin: current.builtin,
        }
    }
}

/// Enable or disable a rule without touching the rest of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEnabled(pub bool);

impl EntityPatch<SecurityRule> for RuleEnabled {
    fn apply_to(&self, current: &SecurityRule) -> SecurityRule {
        SecurityRule {
            enabled: self.0,
            ..current.clone()
        }
    }
}

/// Security rule endpoints: CRUD plus the enabled toggle.
pub struct SecurityRuleApi {
    client: Arc<AdminClient>,
}

impl SecurityRuleApi {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }
}

impl ResourceClient for SecurityRuleApi {
    type Entity = SecurityRule;
    type Create = SecurityRulePayload;
    type Update = SecurityRulePayload;
    type Toggle = RuleEnabled;

    const RESOURCE: &'static str = "security rule";

    async fn load(&self) -> Result<Vec<SecurityRule>, CoreError> {
        let wire = self.client.list_security_rules().await?;
        Ok(wire.into_iter().map(SecurityRule::from).collect())
    }

    async fn create(&self, payload: &SecurityRulePayload) -> Result<SecurityRule, CoreError> {
        let wire = self.client.create_security_rule(&payload.to_wire()).await?;
        Ok(wire.into())
    }

    async fn update(
        &self,
        id: &EntityId,
        payload: &SecurityRulePayload,
    ) -> Result<SecurityRule, CoreError> {
        let wire = self
            .client
            .update_security_rule(id.as_str(), &payload.to_wire())
            .await
            .map_err(|e| missing(e, Self::RESOURCE, id))?;
        Ok(wire.into())
    }

    async fn toggle(&self, id: &EntityId, payload: &RuleEnabled) -> Result<SecurityRule, CoreError> {
        let wire = self
            .client
            .set_security_rule_enabled(id.as_str(), payload.0)
            .await
            .map_err(|e| missing(e, Self::RESOURCE, id))?;
        Ok(wire.into())
    }

    async fn remove(&self, id: &EntityId) -> Result<(), CoreError> {
        self.client
            .delete_security_rule(id.as_str())
            .await
            .map_err(|e| missing(e, Self::RESOURCE, id))
    }
}

// ── Comparisons ──────────────────────────────────────────────────────

/// Payload for kicking off a comparison run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRequest {
    pub source_system: String,
    pub target_system: String,
}

impl ProvisionalSeed<Comparison> for ComparisonRequest {
    fn provisional(&self, id: EntityId) -> Comparison {
        Comparison {
            id,
            source_system: self.source_system.clone(),
            target_system: self.target_system.clone(),
            status: ComparisonStatus::Pending,
            mismatches: 0,
            ran_at: None,
        }
    }
}

/// Comparison endpoints: list, run, delete. Runs are immutable once
/// started, so update and toggle are absent.
pub struct ComparisonApi {
    client: Arc<AdminClient>,
}

impl ComparisonApi {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }

    /// Fetch one run's current state (used by detail views to poll
    /// progress without a full reload).
    pub async fn fetch(&self, id: &EntityId) -> Result<Comparison, CoreError> {
        let wire = self
            .client
            .get_comparison(id.as_str())
            .await
            .map_err(|e| missing(e, <Self as ResourceClient>::RESOURCE, id))?;
        Ok(wire.into())
    }
}

impl ResourceClient for ComparisonApi {
    type Entity = Comparison;
    type Create = ComparisonRequest;
    type Update = Never;
    type Toggle = Never;

    const RESOURCE: &'static str = "comparison";

    async fn load(&self) -> Result<Vec<Comparison>, CoreError> {
        let wire = self.client.list_comparisons().await?;
        Ok(wire.into_iter().map(Comparison::from).collect())
    }

    async fn create(&self, payload: &ComparisonRequest) -> Result<Comparison, CoreError> {
        let wire = self
            .client
            .run_comparison(&types::ComparisonRunRequest {
                source_system: payload.source_system.clone(),
                target_system: payload.target_system.clone(),
            })
            .await?;
        Ok(wire.into())
    }

    async fn update(&self, _id: &EntityId, payload: &Never) -> Result<Comparison, CoreError> {
        match *payload {}
    }

    async fn toggle(&self, _id: &EntityId, payload: &Never) -> Result<Comparison, CoreError> {
        match *payload {}
    }

    async fn remove(&self, id: &EntityId) -> Result<(), CoreError> {
        self.client
            .delete_comparison(id.as_str())
            .await
            .map_err(|e| missing(e, Self::RESOURCE, id))
    }
}
