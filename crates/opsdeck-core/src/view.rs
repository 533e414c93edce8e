// ── Derived projections over store snapshots ──
//
// Pure helpers consumed by rendering code. Nothing here touches the
// network or mutates a collection; safe to call on every redraw.

use std::sync::Arc;

use crate::model::{
    Comparison, ComparisonStatus, Contract, ContractStatus, Notification, Severity,
};

/// Number of notifications still unread. Empty input counts zero.
pub fn unread_count(notifications: &[Arc<Notification>]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

/// Unread totals per severity, used by the tray badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeverityCounts {
    pub info: usize,
    pub warning: usize,
    pub critical: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.info + self.warning + self.critical
    }
}

/// Break unread notifications down by severity.
pub fn unread_by_severity(notifications: &[Arc<Notification>]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for n in notifications.iter().filter(|n| !n.read) {
        match n.severity {
            Severity::Info => counts.info += 1,
            Severity::Warning => counts.warning += 1,
            Severity::Critical => counts.critical += 1,
        }
    }
    counts
}

/// One page of a snapshot. Page numbers are zero-based; a page past
/// the end or a zero page size yields an empty slice.
pub fn paginate<T>(items: &[Arc<T>], page_size: usize, page: usize) -> &[Arc<T>] {
    if page_size == 0 {
        return &[];
    }
    let start = page.saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

/// Number of pages a snapshot spans at the given page size.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 { 0 } else { len.div_ceil(page_size) }
}

/// Contracts in the given lifecycle status, in snapshot order.
pub fn contracts_with_status(
    contracts: &[Arc<Contract>],
    status: ContractStatus,
) -> Vec<Arc<Contract>> {
    contracts.iter().filter(|c| c.status == status).cloned().collect()
}

/// Comparison runs in the given status, in snapshot order.
pub fn comparisons_with_status(
    comparisons: &[Arc<Comparison>],
    status: ComparisonStatus,
) -> Vec<Arc<Comparison>> {
    comparisons.iter().filter(|c| c.status == status).cloned().collect()
}

/// Filter predicate for notification collections.
pub enum NotificationFilter {
    All,
    Unread,
    BySeverity(Severity),
    Custom(Box<dyn Fn(&Notification) -> bool + Send + Sync>),
}

impl NotificationFilter {
    pub fn matches(&self, notification: &Notification) -> bool {
        match self {
            Self::All => true,
            Self::Unread => !notification.read,
            Self::BySeverity(s) => notification.severity == *s,
            Self::Custom(f) => f(notification),
        }
    }
}

/// Filter predicate for contract collections.
pub enum ContractFilter {
    All,
    ByStatus(ContractStatus),
    ByPartner(String),
    Custom(Box<dyn Fn(&Contract) -> bool + Send + Sync>),
}

impl ContractFilter {
    pub fn matches(&self, contract: &Contract) -> bool {
        match self {
            Self::All => true,
            Self::ByStatus(s) => contract.status == *s,
            Self::ByPartner(p) => contract.partner.eq_ignore_ascii_case(p),
            Self::Custom(f) => f(contract),
        }
    }
}
