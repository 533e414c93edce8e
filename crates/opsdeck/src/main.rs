mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Credential and flag management work on local state, not a
        // connected session
        Command::Login(args) => commands::auth::login(args, &cli.global).await,
        Command::Logout => commands::auth::logout(&cli.global),
        Command::Flags(args) => commands::flags_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "opsdeck", &mut std::io::stdout());
            Ok(())
        }

        // All other commands run against a connected console
        cmd => {
            let console_config = build_console_config(&cli.global)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, console_config, &cli.global).await
        }
    }
}

/// Build a `ConsoleConfig` from the config file, profile, and CLI overrides.
fn build_console_config(global: &cli::GlobalOpts) -> Result<opsdeck_core::ConsoleConfig, CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    // If a profile exists, use it with CLI flag overrides
    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return config::resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }

    // No profile found -- try to build from CLI flags / env vars alone
    let url_str = global.console.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config::config_path().display().to_string(),
    })?;

    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "console".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let Some(ref token) = global.token else {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    };
    let auth = opsdeck_core::AuthMethod::Token(secrecy::SecretString::from(token.clone()));

    let tls = if global.insecure {
        opsdeck_core::TlsVerification::DangerAcceptInvalid
    } else {
        opsdeck_core::TlsVerification::SystemDefaults
    };

    Ok(opsdeck_core::ConsoleConfig {
        url,
        auth,
        tls,
        timeout: std::time::Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
        refresh_interval_secs: 0,
        flags: opsdeck_core::ConsoleFlags::default(),
    })
}
