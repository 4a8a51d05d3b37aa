//! Implementation of `lexis shell`.

use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
};

use crate::cli::{
    args::ShellCommand,
    context::{CommandContext, open_searcher_or_failure},
    output::{dim, output_table},
};

/// Lines that end the session.
const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

/// Prompt printed before each query.
const PROMPT: &str = "lexis> ";

/// Reads queries from stdin and prints ranked documents for each.
///
/// A failed query is reported and the session continues.
pub fn run(ctx: &CommandContext, cmd: &ShellCommand) -> ExitCode {
    let context = match ctx.index_context() {
        Ok(context) => context,
        Err(code) => return code,
    };
    let searcher = match open_searcher_or_failure(&context, &ctx.index_dir()) {
        Ok(searcher) => searcher,
        Err(code) => return code,
    };
    let params = ctx.search_params(&context, cmd.limit);

    println!(
        "{}",
        dim(&format!(
            "{} documents, {} terms. Type 'exit' to quit.",
            searcher.document_count(),
            searcher.vocabulary_len()
        ))
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{PROMPT}");
        if let Err(e) = stdout.flush() {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("error: failed to read input: {e}");
                return ExitCode::FAILURE;
            }
            None => {
                println!();
                break;
            }
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&query) {
            break;
        }
        match searcher.search(query, cmd.hint.as_deref(), &params) {
            Ok(results) => output_table(&results),
            Err(e) => eprintln!("error: search failed: {e}"),
        }
    }

    ExitCode::SUCCESS
}
