//! Wire types for the opsdeck console HTTP API (v1).
//!
//! All types match the JSON bodies exchanged with `/api/` endpoints.
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.

use serde::{Deserialize, Serialize};

// ── Notifications ────────────────────────────────────────────────────

/// Operator notification — from `GET /api/notifications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// One of: `INFO`, `WARNING`, `CRITICAL`.
    pub severity: String,
    /// ISO 8601 date-time.
    pub created_at: Option<String>,
    #[serde(default)]
    pub read: bool,
}

// ── Contracts ────────────────────────────────────────────────────────

/// Partner contract — from `GET /api/contracts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractResponse {
    pub id: String,
    pub name: String,
    pub partner: String,
    pub description: Option<String>,
    pub version: String,
    /// One of: `DRAFT`, `ACTIVE`, `SUSPENDED`, `EXPIRED`.
    pub status: String,
    /// ISO 8601 date-time.
    pub updated_at: Option<String>,
    #[serde(default)]
    pub can_delete: bool,
}

/// Body for `POST /api/contracts` and `PUT /api/contracts/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractWriteRequest {
    pub name: String,
    pub partner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
    pub status: String,
}

// ── Security rules ───────────────────────────────────────────────────

/// Security rule — from `GET /api/security-rules`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRuleResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    /// Built-in rules cannot be deleted, only disabled.
    #[serde(default)]
    pub builtin: bool,
}

/// Body for `POST /api/security-rules` and `PUT /api/security-rules/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRuleWriteRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
}

/// Body for `PUT /api/security-rules/{id}/enabled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEnabledRequest {
    pub enabled: bool,
}

// ── Comparisons ──────────────────────────────────────────────────────

/// Data comparison run — from `GET /api/comparisons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub id: String,
    pub source_system: String,
    pub target_system: String,
    /// One of: `PENDING`, `RUNNING`, `SUCCEEDED`, `FAILED`.
    pub status: String,
    #[serde(default)]
    pub mismatches: u32,
    /// ISO 8601 date-time.
    pub ran_at: Option<String>,
}

/// Body for `POST /api/comparisons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRunRequest {
    pub source_system: String,
    pub target_system: String,
}

// ── Auth & status ────────────────────────────────────────────────────

/// Body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authenticated session — from `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Console health — from `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub version: String,
    #[serde(default)]
    pub healthy: bool,
}
