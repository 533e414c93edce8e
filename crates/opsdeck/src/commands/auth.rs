//! Login, logout, and status handlers.
//!
//! `login` verifies credentials against the console before anything is
//! written, then stores the secret in the system keyring (or, on
//! explicit request, in the config file).

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use opsdeck_core::{
    AuthMethod, Console, ConsoleConfig, ConsoleFlags, TlsVerification, view,
};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Login ───────────────────────────────────────────────────────────

pub async fn login(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    // 1. Console URL (flag > existing profile > prompt)
    let console_url = match global
        .console
        .clone()
        .or_else(|| cfg.profiles.get(&profile_name).map(|p| p.console.clone()))
    {
        Some(url) if !url.is_empty() => url,
        _ => Input::new()
            .with_prompt("Console URL")
            .default("https://ops.example.com".into())
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let url: url::Url = console_url.parse().map_err(|_| CliError::Validation {
        field: "console".into(),
        reason: format!("invalid URL: {console_url}"),
    })?;

    // 2. Credentials
    let (auth, username) = if args.session {
        let username = match args.username {
            Some(u) => u,
            None => Input::new()
                .with_prompt("Username")
                .interact_text()
                .map_err(util::prompt_err)?,
        };
        let password = prompt_secret("Password: ")?;
        (
            AuthMethod::Session {
                username: username.clone(),
                password: password.clone(),
            },
            Some(username),
        )
    } else {
        let token = match global.token {
            Some(ref t) => SecretString::from(t.clone()),
            None => prompt_secret("API token: ")?,
        };
        (AuthMethod::Token(token), None)
    };

    // 3. Verify against the live console before storing anything
    let verify_config = ConsoleConfig {
        url,
        auth: auth.clone(),
        tls: if global.insecure {
            TlsVerification::DangerAcceptInvalid
        } else {
            TlsVerification::SystemDefaults
        },
        timeout: std::time::Duration::from_secs(
            global.timeout.unwrap_or(cfg.defaults.timeout),
        ),
        refresh_interval_secs: 0,
        flags: ConsoleFlags::default(),
    };

    let console = Console::new(verify_config);
    util::connect(&console, global).await?;
    let status = console.status().await?;
    console.disconnect().await;

    // 4. Store the secret (keyring unless the user opts out)
    let (plaintext_token, plaintext_password) = match &auth {
        AuthMethod::Token(token) => {
            let plain = store_or_plaintext(token, "API token", global.yes, |s| {
                config::store_token(&profile_name, s)
            })?;
            (plain, None)
        }
        AuthMethod::Session { password, .. } => {
            let plain = store_or_plaintext(password, "password", global.yes, |s| {
                config::store_password(&profile_name, s)
            })?;
            (None, plain)
        }
    };

    // 5. Write the profile, preserving unrelated settings on re-login
    let entry = cfg
        .profiles
        .entry(profile_name.clone())
        .or_insert_with(|| Profile::new(console_url.clone()));
    entry.console = console_url.clone();
    entry.auth_mode = if args.session { "session" } else { "token" }.into();
    entry.token = plaintext_token;
    entry.username = username;
    entry.password = plaintext_password;
    if global.insecure {
        entry.insecure = Some(true);
    }

    if cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }
    config::save_config(&cfg)?;

    if !global.quiet {
        eprintln!(
            "✓ Logged in to {console_url} (opsdeck {}) as profile '{profile_name}'",
            status.version
        );
    }
    Ok(())
}

/// Prompt for a secret without echo, rejecting empty input.
fn prompt_secret(prompt: &str) -> Result<SecretString, CliError> {
    let secret = rpassword::prompt_password(prompt).map_err(util::prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(SecretString::from(secret))
}

/// Offer to store a secret in the system keyring or keep it in the
/// config file. `--yes` picks the keyring without prompting.
///
/// Returns `Some(secret)` when the user chose plaintext, for the caller
/// to place in the profile.
fn store_or_plaintext(
    secret: &SecretString,
    label: &str,
    yes_flag: bool,
    store: impl FnOnce(&SecretString) -> Result<(), opsdeck_config::ConfigError>,
) -> Result<Option<String>, CliError> {
    let use_keyring = yes_flag || {
        let choices = &[
            "System keyring (recommended)",
            "Config file (plaintext)",
        ];
        Select::new()
            .with_prompt(format!("Where to store the {label}?"))
            .items(choices)
            .default(0)
            .interact()
            .map_err(util::prompt_err)?
            == 0
    };

    if use_keyring {
        store(secret)?;
        eprintln!("   ✓ {label} stored in system keyring");
        Ok(None)
    } else {
        warn!("storing {label} in plaintext config");
        Ok(Some(secret.expose_secret().to_owned()))
    }
}

// ── Logout ──────────────────────────────────────────────────────────

pub fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    config::delete_token(&profile_name)?;
    config::delete_password(&profile_name)?;

    // Strip any plaintext secrets left in the file.
    let mut stripped = false;
    if let Some(profile) = cfg.profiles.get_mut(&profile_name) {
        stripped = profile.token.take().is_some() | profile.password.take().is_some();
    }
    if stripped {
        config::save_config(&cfg)?;
    }

    if !global.quiet {
        eprintln!("✓ Credentials removed for profile '{profile_name}'");
    }
    Ok(())
}

// ── Status ──────────────────────────────────────────────────────────

#[derive(serde::Serialize)]
struct StatusReport {
    version: String,
    healthy: bool,
    notifications: usize,
    unread: usize,
    unread_critical: usize,
    contracts: usize,
    security_rules: usize,
    comparisons: usize,
}

pub async fn status(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let status = console.status().await?;
    let store = console.store();
    let unread = view::unread_by_severity(&store.notifications_snapshot());

    let report = StatusReport {
        version: status.version,
        healthy: status.healthy,
        notifications: store.notification_count(),
        unread: unread.total(),
        unread_critical: unread.critical,
        contracts: store.contract_count(),
        security_rules: store.security_rule_count(),
        comparisons: store.comparison_count(),
    };

    let color = output::should_color(&global.color);
    let detail = |r: &StatusReport| {
        use owo_colors::OwoColorize;
        let health = match (r.healthy, color) {
            (true, true) => "healthy".green().to_string(),
            (false, true) => "degraded".red().to_string(),
            (true, false) => "healthy".into(),
            (false, false) => "degraded".into(),
        };
        [
            format!("Version:        {}", r.version),
            format!("Health:         {health}"),
            format!(
                "Notifications:  {} ({} unread, {} critical)",
                r.notifications, r.unread, r.unread_critical
            ),
            format!("Contracts:      {}", r.contracts),
            format!("Security rules: {}", r.security_rules),
            format!("Comparisons:    {}", r.comparisons),
        ]
        .join("\n")
    };

    let out = output::render_single(&global.output, &report, detail, |r| r.version.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
