//! Shared helpers for command handlers.

use std::time::Duration;

use indicatif::ProgressBar;

use opsdeck_core::Console;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::CliError;

/// Connect to the console with a spinner on stderr.
///
/// The spinner disappears once the initial load settles; indicatif hides
/// it automatically when stderr is not a terminal.
pub async fn connect(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let spinner = if global.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_message(format!("Connecting to {}", console.config().url));
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    };

    let result = console.connect().await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    result.map_err(CliError::from)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Comma-separated profile names for "profile not found" help text.
pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}
