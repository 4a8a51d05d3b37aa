//! Command-line interface for the `lexis` search tool.

use std::process::ExitCode;

use clap::Parser;
use lexis::cli::{
    CommandContext,
    args::{Cli, Commands},
    commands,
    logging::init_logging,
};
use tracing::debug;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = match &cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    debug!(cwd = %ctx.cwd.display(), index = %ctx.index_dir().display(), "context loaded");

    commands::run(cli.command, &ctx)
}
