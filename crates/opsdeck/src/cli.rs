//! Clap derive structures for the `opsdeck` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// opsdeck -- command-line client for the operations console
#[derive(Debug, Parser)]
#[command(
    name = "opsdeck",
    version,
    about = "Manage the opsdeck operations console from the command line",
    long_about = "A CLI for the opsdeck administrative console.\n\n\
        Talks to the console's HTTP API, keeps a local snapshot of every\n\
        resource collection, and applies mutations optimistically with\n\
        automatic rollback on rejection.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Console profile to use
    #[arg(long, short = 'p', env = "OPSDECK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Console URL (overrides profile)
    #[arg(long, short = 'c', env = "OPSDECK_CONSOLE", global = true)]
    pub console: Option<String>,

    /// API token
    #[arg(long, env = "OPSDECK_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "OPSDECK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "OPSDECK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "OPSDECK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authenticate against a console and store credentials
    Login(LoginArgs),

    /// Remove stored credentials for the active profile
    Logout,

    /// Console health and collection summary
    Status,

    /// Operator notifications
    #[command(alias = "notif", alias = "n")]
    Notifications(NotificationsArgs),

    /// Partner contracts
    #[command(alias = "con")]
    Contracts(ContractsArgs),

    /// Security rules
    #[command(alias = "r")]
    Rules(RulesArgs),

    /// Data comparison runs
    #[command(alias = "cmp")]
    Comparisons(ComparisonsArgs),

    /// Console section visibility flags
    Flags(FlagsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Use username/password session auth instead of a token
    #[arg(long)]
    pub session: bool,

    /// Username for session auth (prompted if omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NOTIFICATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NotificationsArgs {
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List notifications
    #[command(alias = "ls")]
    List(NotificationListArgs),

    /// Mark one notification as read
    Read {
        /// Notification ID
        id: String,
    },

    /// Mark every unread notification as read
    ReadAll,

    /// Delete a notification
    #[command(alias = "rm")]
    Delete {
        /// Notification ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct NotificationListArgs {
    /// Only unread notifications
    #[arg(long, short = 'u')]
    pub unread: bool,

    /// Page number (zero-based)
    #[arg(long, default_value = "0")]
    pub page: usize,

    /// Results per page
    #[arg(long, default_value = "25")]
    pub per_page: usize,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONTRACTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ContractsArgs {
    #[command(subcommand)]
    pub command: ContractsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ContractsCommand {
    /// List contracts
    #[command(alias = "ls")]
    List(ContractListArgs),

    /// Show one contract in detail
    Show {
        /// Contract ID
        id: String,
    },

    /// Create a contract (missing fields are prompted)
    // `ContractFieldArgs` defines its own `--version` (the contract's version
    // label), which collides with the auto-generated version flag.
    #[command(disable_version_flag = true)]
    Create(ContractFieldArgs),

    /// Edit a contract (unset fields keep their current value)
    #[command(disable_version_flag = true)]
    Edit {
        /// Contract ID
        id: String,

        #[command(flatten)]
        fields: ContractFieldArgs,
    },

    /// Delete a contract
    #[command(alias = "rm")]
    Delete {
        /// Contract ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ContractListArgs {
    /// Filter by lifecycle status
    #[arg(long)]
    pub status: Option<ContractStatusArg>,

    /// Filter by partner organization (case-insensitive)
    #[arg(long)]
    pub partner: Option<String>,
}

#[derive(Debug, Args)]
pub struct ContractFieldArgs {
    /// Contract name
    #[arg(long)]
    pub name: Option<String>,

    /// Partner organization
    #[arg(long)]
    pub partner: Option<String>,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,

    /// Version label (e.g., "2.1")
    #[arg(long)]
    pub version: Option<String>,

    /// Lifecycle status
    #[arg(long)]
    pub status: Option<ContractStatusArg>,
}

/// Contract lifecycle states accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ContractStatusArg {
    Draft,
    Active,
    Suspended,
    Expired,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RULES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    /// List security rules
    #[command(alias = "ls")]
    List,

    /// Create a rule (missing fields are prompted)
    Create {
        /// Rule name
        #[arg(long)]
        name: Option<String>,

        /// Rule description
        #[arg(long)]
        description: Option<String>,

        /// Create the rule in the disabled state
        #[arg(long)]
        disabled: bool,
    },

    /// Edit a rule (unset fields keep their current value)
    Edit {
        /// Rule ID
        id: String,

        /// New rule name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,
    },

    /// Enable a rule
    Enable {
        /// Rule ID
        id: String,
    },

    /// Disable a rule
    Disable {
        /// Rule ID
        id: String,
    },

    /// Delete a rule
    #[command(alias = "rm")]
    Delete {
        /// Rule ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPARISONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ComparisonsArgs {
    #[command(subcommand)]
    pub command: ComparisonsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ComparisonsCommand {
    /// List comparison runs
    #[command(alias = "ls")]
    List(ComparisonListArgs),

    /// Fetch one run's current state from the console
    Show {
        /// Comparison ID
        id: String,
    },

    /// Start a new comparison run
    Run {
        /// Source system name
        #[arg(long, required = true)]
        source: String,

        /// Target system name
        #[arg(long, required = true)]
        target: String,
    },

    /// Delete a comparison run
    #[command(alias = "rm")]
    Delete {
        /// Comparison ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ComparisonListArgs {
    /// Filter by run status
    #[arg(long)]
    pub status: Option<ComparisonStatusArg>,
}

/// Comparison run states accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ComparisonStatusArg {
    Pending,
    Running,
    Succeeded,
    Failed,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FLAGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FlagsArgs {
    #[command(subcommand)]
    pub command: FlagsCommand,
}

#[derive(Debug, Subcommand)]
pub enum FlagsCommand {
    /// Show section visibility switches for the active profile
    Show,

    /// Turn a section switch on or off
    Set {
        /// Flag name (e.g., "contract-editing")
        flag: String,

        /// New state
        state: FlagState,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FlagState {
    On,
    Off,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
