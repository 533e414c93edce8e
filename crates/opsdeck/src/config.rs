//! CLI configuration -- thin wrapper around `opsdeck_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--console, --token, etc.).

use std::time::Duration;

use secrecy::SecretString;

use opsdeck_core::{AuthMethod, ConsoleConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use opsdeck_config::{
    Config, Defaults, Profile, config_path, delete_password, delete_token,
    load_config_or_default, save_config, store_password, store_token,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a `Profile` + global flags into a `ConsoleConfig`.
///
/// CLI flag overrides take priority over profile values, which in turn
/// beat the `[defaults]` section.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ConsoleConfig, CliError> {
    // 1. Console URL (flag > env > profile)
    let url_str = global.console.as_deref().unwrap_or(&profile.console);
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "console".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Auth credentials (CLI token flag takes priority)
    let auth = if let Some(ref token) = global.token {
        AuthMethod::Token(SecretString::from(token.clone()))
    } else {
        opsdeck_config::resolve_auth(profile, profile_name)?
    };

    // 3. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 4. Timeout (flag > profile > defaults)
    let timeout_secs = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(defaults.timeout);

    Ok(ConsoleConfig {
        url,
        auth,
        tls,
        timeout: Duration::from_secs(timeout_secs),
        // One-shot CLI invocations never want the background refresh.
        refresh_interval_secs: 0,
        flags: profile.flags,
    })
}
