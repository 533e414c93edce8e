// ── Unified domain model ──
//
// Every type in this module is the canonical representation of a
// console entity. Wire types from opsdeck-api are converted into these
// in `convert.rs`; consumers (CLI, automation) only ever see the
// domain types.

pub mod entity_id;

pub mod comparison;
pub mod contract;
pub mod notification;
pub mod security_rule;

/// Behavior every synchronized resource type shares.
///
/// The id is the uniqueness key inside a `ResourceCollection` and the
/// handle every mutation is addressed by.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> &EntityId;
}

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use opsdeck_core::model::*` gives you everything.

// Core identity
pub use entity_id::EntityId;

// Notifications
pub use notification::{Notification, Severity};

// Contracts
pub use contract::{Contract, ContractStatus};

// Security rules
pub use security_rule::SecurityRule;

// Comparisons
pub use comparison::{Comparison, ComparisonStatus};
