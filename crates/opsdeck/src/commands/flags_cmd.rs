//! Console flag command handlers.
//!
//! Flags live in the profile, not on the server, so these commands
//! work without a console connection.

use strum::IntoEnumIterator;

use opsdeck_core::{ConsoleFlag, FlagStore};

use crate::cli::{FlagState, FlagsArgs, FlagsCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: FlagsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        FlagsCommand::Show => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let flags = cfg
                .profiles
                .get(&profile_name)
                .map(|p| p.flags)
                .unwrap_or_default();
            let store = FlagStore::new(flags);
            let color = output::should_color(&global.color);

            let out = output::render_single(
                &global.output,
                &flags,
                |_| {
                    ConsoleFlag::iter()
                        .map(|flag| {
                            let name = flag.to_string();
                            let cell = output::bool_cell(store.is_enabled(flag), "on", "off", color);
                            format!("{name:<20}{cell}")
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                },
                |_| {
                    ConsoleFlag::iter()
                        .map(|flag| {
                            let state = if store.is_enabled(flag) { "on" } else { "off" };
                            format!("{flag}={state}")
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FlagsCommand::Set { flag, state } => {
            let parsed: ConsoleFlag = flag.parse().map_err(|_| {
                let valid = ConsoleFlag::iter()
                    .map(|f| f.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                CliError::Validation {
                    field: "flag".into(),
                    reason: format!("unknown flag '{flag}' (valid: {valid})"),
                }
            })?;
            let enabled = matches!(state, FlagState::On);

            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let available = util::available_profiles(&cfg);
            let profile = cfg.profiles.get_mut(&profile_name).ok_or_else(|| {
                CliError::ProfileNotFound {
                    name: profile_name.clone(),
                    available,
                }
            })?;

            // FlagStore owns the flag-to-field mapping; go through it so
            // the CLI never grows its own copy.
            let store = FlagStore::new(profile.flags);
            store.set(parsed, enabled);
            profile.flags = store.current();

            config::save_config(&cfg)?;
            if !global.quiet {
                let word = if enabled { "on" } else { "off" };
                eprintln!("✓ Flag '{parsed}' turned {word} for profile '{profile_name}'");
            }
            Ok(())
        }
    }
}
