//! Implementation of `lexis search`.

use std::process::ExitCode;

use crate::cli::{
    args::SearchCommand,
    context::{CommandContext, open_searcher_or_failure},
    output::{output_json, output_table},
};

/// Searches the index and prints ranked documents.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let context = match ctx.index_context() {
        Ok(context) => context,
        Err(code) => return code,
    };
    let searcher = match open_searcher_or_failure(&context, &ctx.index_dir()) {
        Ok(searcher) => searcher,
        Err(code) => return code,
    };
    let params = ctx.search_params(&context, cmd.limit);

    let query = cmd.query.join(" ");
    let results = match searcher.search(&query, cmd.hint.as_deref(), &params) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("error: search failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return output_json(&results);
    }
    output_table(&results);
    ExitCode::SUCCESS
}
