//! Command dispatch: connects a console session, routes to the handler,
//! and tears the session down afterwards.

pub mod auth;
pub mod comparisons;
pub mod contracts;
pub mod flags_cmd;
pub mod notifications;
pub mod rules;
pub mod util;

use opsdeck_core::{Console, ConsoleConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a console-bound command: connect, run the handler, disconnect.
pub async fn dispatch(
    cmd: Command,
    config: ConsoleConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let console = Console::new(config);
    util::connect(&console, global).await?;

    let result = match cmd {
        Command::Status => auth::status(&console, global).await,
        Command::Notifications(args) => notifications::handle(&console, args, global).await,
        Command::Contracts(args) => contracts::handle(&console, args, global).await,
        Command::Rules(args) => rules::handle(&console, args, global).await,
        Command::Comparisons(args) => comparisons::handle(&console, args, global).await,
        // Login, Logout, Flags, and Completions are handled before dispatch
        Command::Login(_) | Command::Logout | Command::Flags(_) | Command::Completions(_) => {
            unreachable!()
        }
    };

    console.disconnect().await;
    result
}
