//! Clap derive structures for the `fluxgate` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fluxgate -- usage analytics for a proxy/VPN fleet panel
#[derive(Debug, Parser)]
#[command(
    name = "fluxgate",
    version,
    about = "Inspect proxy fleet traffic usage from the command line",
    long_about = "Query a fluxgate panel for per-node or per-admin traffic usage,\n\
        bucketed and gap-filled into chart-ready rows.",
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
    /// Panel profile to use
    #[arg(long, short = 'p', env = "FLUXGATE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Panel URL (overrides profile)
    #[arg(long, env = "FLUXGATE_PANEL", global = true)]
    pub panel: Option<String>,

    /// Panel API token
    #[arg(long, env = "FLUXGATE_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Config file path (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FLUXGATE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Label locale (latin, farsi)
    #[arg(long, env = "FLUXGATE_LOCALE", global = true)]
    pub locale: Option<String>,

    /// Display timezone as minutes east of UTC
    #[arg(long, env = "FLUXGATE_UTC_OFFSET", global = true, allow_hyphen_values = true)]
    pub utc_offset_minutes: Option<i32>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "FLUXGATE_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
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
    /// Query bucketed traffic usage
    #[command(alias = "u")]
    Usage(UsageArgs),

    /// List proxy nodes
    #[command(alias = "n")]
    Nodes(NodesArgs),

    /// List admin accounts
    #[command(alias = "a")]
    Admins(AdminsArgs),
}

// ── Usage ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsageArgs {
    #[command(subcommand)]
    pub command: UsageCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsageCommand {
    /// Usage broken down by proxy node
    Nodes(RangeArgs),
    /// Usage broken down by admin account
    Admins(RangeArgs),
}

/// Time-range selection shared by usage queries.
///
/// Either a relative shortcut or an explicit window; mixing the two is
/// a usage error caught by clap.
#[derive(Debug, Args)]
pub struct RangeArgs {
    /// Relative range shortcut: 1h, 6h, 24h, 3d, 1w, 2w, 1m, all
    #[arg(long, short = 'l', conflicts_with_all = ["from", "to"])]
    pub last: Option<String>,

    /// Range start (RFC 3339 or Unix seconds)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Range end (RFC 3339 or Unix seconds)
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

// ── Entities ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List all proxy nodes
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct AdminsArgs {
    #[command(subcommand)]
    pub command: AdminsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminsCommand {
    /// List all admin accounts
    #[command(alias = "ls")]
    List,
}
