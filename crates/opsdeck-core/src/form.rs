// ── Form drafts ──
//
// Editable working copies used by create/edit dialogs. A draft is
// seeded from a stored entity (edit) or from defaults (create), then
// converted back into a mutation payload once it validates. Validation
// here is field presence only; deeper rules stay on the server and
// come back as API errors.

use crate::error::CoreError;
use crate::model::{Contract, ContractStatus, SecurityRule};
use crate::resources::{ComparisonRequest, ContractPayload, SecurityRulePayload};

fn required(field: &'static str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationFailed {
            field,
            reason: "must not be empty".into(),
        });
    }
    Ok(trimmed.to_string())
}

/// Optional free-text field. Whitespace-only input collapses to absent.
fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ── Contracts ────────────────────────────────────────────────────────

/// Editable contract fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDraft {
    pub name: String,
    pub partner: String,
    pub description: String,
    pub version: String,
    pub status: ContractStatus,
}

impl ContractDraft {
    /// Blank draft for a create dialog.
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            partner: String::new(),
            description: String::new(),
            version: "1.0".into(),
            status: ContractStatus::Draft,
        }
    }

    /// Seed an edit dialog from the stored entity.
    pub fn from_entity(contract: &Contract) -> Self {
        Self {
            name: contract.name.clone(),
            partner: contract.partner.clone(),
            description: contract.description.clone().unwrap_or_default(),
            version: contract.version.clone(),
            status: contract.status,
        }
    }

    /// Validate and convert into a mutation payload.
    pub fn to_payload(&self) -> Result<ContractPayload, CoreError> {
        Ok(ContractPayload {
            name: required("name", &self.name)?,
            partner: required("partner", &self.partner)?,
            description: optional(&self.description),
            version: required("version", &self.version)?,
            status: self.status,
        })
    }
}

impl Default for ContractDraft {
    fn default() -> Self {
        Self::empty()
    }
}

// ── Security rules ───────────────────────────────────────────────────

/// Editable security rule fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityRuleDraft {
    pub name: String,
    pub description: String,
    pub enabled: bool,
}

impl SecurityRuleDraft {
    /// Blank draft for a create dialog. New rules start enabled.
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            enabled: true,
        }
    }

    /// Seed an edit dialog from the stored entity.
    pub fn from_entity(rule: &SecurityRule) -> Self {
        Self {
            name: rule.name.clone(),
            description: rule.description.clone().unwrap_or_default(),
            enabled: rule.enabled,
        }
    }

    /// Validate and convert into a mutation payload.
    pub fn to_payload(&self) -> Result<SecurityRulePayload, CoreError> {
        Ok(SecurityRulePayload {
            name: required("name", &self.name)?,
            description: optional(&self.description),
            enabled: self.enabled,
        })
    }
}

impl Default for SecurityRuleDraft {
    fn default() -> Self {
        Self::empty()
    }
}

// ── Comparisons ──────────────────────────────────────────────────────

/// Fields for launching a comparison run. Runs are immutable once
/// started, so there is no edit seeding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonDraft {
    pub source_system: String,
    pub target_system: String,
}

impl ComparisonDraft {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate and convert into a run request.
    pub fn to_payload(&self) -> Result<ComparisonRequest, CoreError> {
        Ok(ComparisonRequest {
            source_system: required("source_system", &self.source_system)?,
            target_system: required("target_system", &self.target_system)?,
        })
    }
}
