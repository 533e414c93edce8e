// ── Comparison domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;

/// Execution state of a data comparison run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Data comparison run between two upstream systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub id: EntityId,
    pub source_system: String,
    pub target_system: String,
    pub status: ComparisonStatus,
    pub mismatches: u32,
    pub ran_at: Option<DateTime<Utc>>,
}

impl super::Entity for Comparison {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
