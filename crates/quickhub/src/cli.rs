//! Clap derive structures for the `quickhub` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use quickhub_core::{SortColumn, SortDirection};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// quickhub -- browse, monitor, and edit hub QuickApps from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "quickhub",
    version,
    about = "Manage hub QuickApps from the command line",
    long_about = "A CLI for Home Center hubs: list installed QuickApps, keep a live\n\
        view in sync with the hub's event stream, and manage QuickApp source files.",
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
    /// Hub host name or address (overrides config file)
    #[arg(long, env = "HC3_HOST", global = true)]
    pub host: Option<String>,

    /// Basic auth user
    #[arg(long, env = "HC3_USER", global = true)]
    pub user: Option<String>,

    /// Basic auth password
    #[arg(long, env = "HC3_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// URL scheme for the hub: http or https
    #[arg(long, env = "HC3_PROTOCOL", global = true)]
    pub protocol: Option<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "HC3_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "HC3_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and monitor QuickApps
    #[command(alias = "app", alias = "a")]
    Apps(AppsArgs),

    /// Manage a QuickApp's source files
    #[command(alias = "file", alias = "f")]
    Files(FilesArgs),

    /// Inspect or initialize configuration
    Config(ConfigArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

// ── apps ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AppsArgs {
    #[command(subcommand)]
    pub command: AppsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AppsCommand {
    /// List QuickApps (children included, marked read-only)
    #[command(alias = "ls")]
    List {
        /// Column to sort by: id, name, type, modified
        #[arg(long, default_value = "id", value_parser = parse_sort_column)]
        sort: SortColumn,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,
    },

    /// Show one device as raw JSON
    Info {
        /// Device id
        id: u64,
    },

    /// Print the hub's web UI URL for a device
    Url {
        /// Device id
        id: u64,
    },

    /// Keep a live listing in sync with the hub's event stream
    Watch {
        /// Column to sort by: id, name, type, modified
        #[arg(long, default_value = "id", value_parser = parse_sort_column)]
        sort: SortColumn,
    },
}

impl AppsCommand {
    pub fn direction(desc: bool) -> SortDirection {
        if desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

// ── files ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FilesArgs {
    /// QuickApp device id
    pub id: u64,

    #[command(subcommand)]
    pub command: FilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    /// List the QuickApp's files
    #[command(alias = "ls")]
    List,

    /// Print one file's content
    Cat {
        /// File name
        name: String,
    },

    /// Overwrite one file's content from a local file or stdin
    Push {
        /// File name on the hub
        name: String,

        /// Local file to read (stdin when omitted)
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Create a new (empty) Lua file
    New {
        /// File name
        name: String,
    },

    /// Rename a file
    Mv {
        /// Current file name
        from: String,
        /// New file name
        to: String,
    },

    /// Delete a file
    Rm {
        /// File name
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

// ── config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the resolved configuration (password masked)
    Show,

    /// Write a starter config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Value parsers ────────────────────────────────────────────────────

fn parse_sort_column(value: &str) -> Result<SortColumn, String> {
    value
        .parse()
        .map_err(|_| format!("expected one of: id, name, type, modified (got '{value}')"))
}
