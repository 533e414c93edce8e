// ── Security rule domain types ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// Security rule -- a toggleable policy enforced by the console backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityRule {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    /// Built-in rules ship with the console and can only be disabled.
    pub builtin: bool,
}

impl super::Entity for SecurityRule {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
