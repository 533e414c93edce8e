//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use opsdeck_config::ConfigError;
use opsdeck_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 4;
    pub const NOT_FOUND: i32 = 5;
    pub const VALIDATION: i32 = 6;
    pub const REJECTED: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to console at {url}")]
    #[diagnostic(
        code(opsdeck::connection_failed),
        help(
            "Check that the console is reachable.\n\
             URL: {url}\n\
             Try: opsdeck status -v"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Not connected to a console")]
    #[diagnostic(
        code(opsdeck::disconnected),
        help("The connection was closed before the operation completed.")
    )]
    Disconnected,

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(opsdeck::timeout),
        help("Increase the timeout with --timeout or check console responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(opsdeck::auth_failed),
        help(
            "Verify your token or session credentials.\n\
             Run: opsdeck login"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(opsdeck::no_credentials),
        help(
            "Store credentials with: opsdeck login\n\
             Or set the OPSDECK_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    #[error("Keyring access failed: {0}")]
    #[diagnostic(
        code(opsdeck::keyring),
        help("Your system keyring may be locked or unavailable.")
    )]
    Keyring(String),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(opsdeck::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: opsdeck login"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(opsdeck::no_config),
        help(
            "Create one with: opsdeck login\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(opsdeck::config),
        help("Fix the config file or recreate it with: opsdeck login")
    )]
    ConfigFile { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(opsdeck::not_found),
        help("Run: opsdeck {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(opsdeck::validation))]
    Validation { field: String, reason: String },

    // ── Server rejection ─────────────────────────────────────────────
    #[error("Console rejected the operation: {message}")]
    #[diagnostic(code(opsdeck::rejected))]
    Rejected {
        message: String,
        code: Option<String>,
    },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Disconnected => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::ProfileNotFound { .. } | Self::NoConfig { .. } | Self::ConfigFile { .. } => {
                exit_code::CONFIG
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::VALIDATION,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Keyring(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

/// The `list` invocation that would have shown the missing entity.
fn list_command_for(entity_type: &str) -> String {
    match entity_type {
        "notification" => "notifications list".into(),
        "contract" => "contracts list".into(),
        "security rule" => "rules list".into(),
        "comparison" => "comparisons list".into(),
        other => format!("{other}s list"),
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Disconnected => CliError::Disconnected,

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                resource_type: entity_type.into(),
                identifier,
                list_command: list_command_for(entity_type),
            },

            CoreError::ValidationFailed { field, reason } => CliError::Validation {
                field: field.into(),
                reason,
            },

            CoreError::Api {
                message,
                code,
                status: _,
            } => CliError::Rejected { message, code },

            CoreError::Config { message } => CliError::ConfigFile { message },

            CoreError::Internal(message) => CliError::Rejected {
                message,
                code: Some("internal".into()),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },

            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },

            ConfigError::Keyring(e) => CliError::Keyring(e.to_string()),

            ConfigError::Serialization(e) => CliError::ConfigFile {
                message: e.to_string(),
            },

            ConfigError::Figment(e) => CliError::ConfigFile {
                message: e.to_string(),
            },

            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
