// ── API-to-domain type conversions ──
//
// Bridges raw `opsdeck_api` wire types into canonical
// `opsdeck_core::model` domain types. Each `From` impl parses strings
// into strong types and fills sensible defaults for missing optional
// data.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use tracing::warn;

use opsdeck_api::types::{
    ComparisonResponse, ContractResponse, NotificationResponse, SecurityRuleResponse,
};

use crate::model::{
    comparison::{Comparison, ComparisonStatus},
    contract::{Contract, ContractStatus},
    entity_id::EntityId,
    notification::{Notification, Severity},
    security_rule::SecurityRule,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an ISO 8601 datetime string, silently dropping unparseable values.
fn parse_datetime(raw: &Option<String>) -> Option<DateTime<Utc>> {
    raw.as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a wire status string, falling back (with a log line) when the
/// server sends a value this build does not know about.
fn parse_or<T: FromStr + Copy>(raw: &str, fallback: T, kind: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        warn!("unrecognized {kind} value {raw:?}");
        fallback
    })
}

// ── Notification ───────────────────────────────────────────────────

impl From<NotificationResponse> for Notification {
    fn from(n: NotificationResponse) -> Self {
        Notification {
            id: EntityId::from(n.id),
            title: n.title,
            body: n.body,
            severity: parse_or(&n.severity, Severity::Info, "severity"),
            created_at: parse_datetime(&n.created_at),
            read: n.read,
        }
    }
}

// ── Contract ───────────────────────────────────────────────────────

impl From<ContractResponse> for Contract {
    fn from(c: ContractResponse) -> Self {
        Contract {
            id: EntityId::from(c.id),
            name: c.name,
            partner: c.partner,
            description: c.description,
            version: c.version,
            status: parse_or(&c.status, ContractStatus::Draft, "contract status"),
            updated_at: parse_datetime(&c.updated_at),
            can_delete: c.can_delete,
        }
    }
}

// ── Security rule ──────────────────────────────────────────────────

impl From<SecurityRuleResponse> for SecurityRule {
    fn from(r: SecurityRuleResponse) -> Self {
        SecurityRule {
            id: EntityId::from(r.id),
            name: r.name,
            description: r.description,
            enabled: r.enabled,
            builtin: r.builtin,
        }
    }
}

// ── Comparison ─────────────────────────────────────────────────────

impl From<ComparisonResponse> for Comparison {
    fn from(c: ComparisonResponse) -> Self {
        Comparison {
            id: EntityId::from(c.id),
            source_system: c.source_system,
            target_system: c.target_system,
            status: parse_or(&c.status, ComparisonStatus::Pending, "comparison status"),
            mismatches: c.mismatches,
            ran_at: parse_datetime(&c.ran_at),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn severity_parses_known_values() {
        assert_eq!(parse_or("CRITICAL", Severity::Info, "severity"), Severity::Critical);
        assert_eq!(parse_or("warning", Severity::Info, "severity"), Severity::Warning);
    }

    #[test]
    fn unknown_severity_falls_back_to_info() {
        assert_eq!(parse_or("SHOUTING", Severity::Info, "severity"), Severity::Info);
    }

    #[test]
    fn datetime_parses_rfc3339() {
        let parsed = parse_datetime(&Some("2024-05-01T10:00:00Z".to_owned())).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert!(parse_datetime(&Some("yesterday".to_owned())).is_none());
        assert!(parse_datetime(&None).is_none());
    }

    #[test]
    fn contract_conversion_maps_all_fields() {
        let wire = ContractResponse {
            id: "c-42".into(),
            name: "Data export".into(),
            partner: "Acme".into(),
            description: Some("Quarterly".into()),
            version: "2.0".into(),
            status: "ACTIVE".into(),
            updated_at: Some("2024-05-01T10:00:00Z".into()),
            can_delete: false,
        };

        let contract = Contract::from(wire);

        assert_eq!(contract.id.as_str(), "c-42");
        assert_eq!(contract.status, ContractStatus::Active);
        assert!(contract.updated_at.is_some());
        assert!(!contract.can_delete);
    }
}
