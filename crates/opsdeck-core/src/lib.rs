// opsdeck-core: Reactive resource-sync layer between opsdeck-api and
// consumers (CLI and embedding UIs).

pub mod config;
pub mod console;
pub mod convert;
pub mod error;
pub mod flags;
pub mod form;
pub mod model;
pub mod resources;
pub mod store;
pub mod stream;
pub mod sync;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthMethod, ConsoleConfig, TlsVerification};
pub use console::{ConnectionState, Console, ConsoleStatus, ResourceSyncs};
pub use error::CoreError;
pub use flags::{ConsoleFlag, ConsoleFlags, FlagStore};
pub use form::{ComparisonDraft, ContractDraft, SecurityRuleDraft};
pub use resources::{
    ComparisonApi, ComparisonRequest, ContractApi, ContractPayload, MarkRead, NotificationApi,
    RuleEnabled, SecurityRuleApi, SecurityRulePayload,
};
pub use store::ConsoleStore;
pub use stream::EntityStream;
pub use sync::{LoadState, MutationKind, PendingOperation, ResourceSync};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Comparison, ComparisonStatus, Contract, ContractStatus, EntityId, Notification, SecurityRule,
    Severity,
};
