//! Clap argument definitions for the `lexis` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "lexis")]
#[command(about = "Full-text search over structured document collections")]
pub struct Cli {
    /// Log verbosity (-v for info, -vv for debug); overrides LEXIS_LOG
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `lexis init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `lexis index`.
#[derive(Args, Debug, Clone)]
pub struct IndexCommand {
    /// Collection directory or file [default: [index].collection]
    pub path: Option<PathBuf>,
}

/// Arguments for `lexis search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Query words, joined into one query
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Query type hint, e.g. diagnosis, test or treatment
    #[arg(short = 't', long = "type")]
    pub hint: Option<String>,

    /// Maximum results to show [default: [search].limit]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `lexis shell`.
#[derive(Args, Debug, Clone)]
pub struct ShellCommand {
    /// Query type hint applied to every query
    #[arg(short = 't', long = "type")]
    pub hint: Option<String>,

    /// Maximum results per query [default: [search].limit]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Arguments for `lexis inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectCommand {
    /// Document file to inspect
    pub file: PathBuf,
}

/// Supported `lexis` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize lexis configuration in current directory
    Init(InitCommand),

    /// Rebuild the index from a document collection
    Index(IndexCommand),

    /// Rank documents against a free-text query
    #[command(after_help = "\
EXAMPLES:
  lexis search heart disease
  lexis search -t treatment chronic heart failure
  lexis search --json -n 3 lung cancer")]
    Search(SearchCommand),

    /// Read queries from stdin until `exit` or end of input
    Shell(ShellCommand),

    /// Show configuration and index status
    Status,

    /// Show how lexis reads and normalizes a document
    Inspect(InspectCommand),
}
