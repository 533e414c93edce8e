// ── Contract domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;

/// Lifecycle state of a partner contract.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    #[default]
    Draft,
    Active,
    Suspended,
    Expired,
}

/// Partner contract -- a versioned agreement governing data exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: EntityId,
    pub name: String,
    pub partner: String,
    pub description: Option<String>,
    pub version: String,
    pub status: ContractStatus,
    pub updated_at: Option<DateTime<Utc>>,
    /// Contracts still referenced by active exports cannot be deleted.
    pub can_delete: bool,
}

impl super::Entity for Contract {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
