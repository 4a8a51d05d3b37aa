//! Implementation of `lexis index`.

use std::{path::Path, process::ExitCode, time::Instant};

use lexis_index::{IndexStats, Indexer, MergeStats, ProgressReporter};

use crate::cli::{
    args::IndexCommand,
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Prints a line per spill and a running document count.
struct ConsoleReporter {
    /// Documents read so far.
    documents: usize,
}

impl ProgressReporter for ConsoleReporter {
    fn on_document(&mut self, _path: &Path, _terms: usize) {
        self.documents += 1;
    }

    fn on_spill(&mut self, sequence: usize, terms: usize) {
        println!(
            "{}",
            dim(&format!(
                "partial index {sequence}: {terms} terms after {} documents",
                self.documents
            ))
        );
    }

    fn on_merge_complete(&mut self, stats: &MergeStats) {
        println!(
            "{}",
            dim(&format!("merged into {} terms ({} merges)", stats.terms, stats.merges))
        );
    }

    fn on_complete(&mut self, _stats: &IndexStats) {}
}

/// Rebuilds the index from the given or configured collection.
pub fn run(ctx: &CommandContext, cmd: &IndexCommand) -> ExitCode {
    let collection = match cmd
        .path
        .as_ref()
        .map(|p| ctx.cwd.join(p))
        .or_else(|| ctx.config.index.collection.clone())
    {
        Some(path) => path,
        None => {
            eprintln!("error: no collection given");
            eprintln!("Pass a path, or set [index] collection in .lexis.toml.");
            return ExitCode::FAILURE;
        }
    };

    let context = match ctx.index_context() {
        Ok(context) => context,
        Err(code) => return code,
    };
    let index_dir = ctx.index_dir();

    println!(
        "Indexing {} into {}",
        collection.display(),
        index_dir.display()
    );
    let started = Instant::now();
    let mut reporter = ConsoleReporter { documents: 0 };
    let stats = match Indexer::new(&context, &index_dir).index(&collection, &mut reporter) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("error: indexing failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!();
    println!("{}", subheader("Index built:"));
    println!("   documents:        {}", stats.documents);
    println!("   terms:            {}", stats.terms);
    println!("   partial indexes:  {}", stats.partial_indexes);
    println!("   merges:           {}", stats.merges);
    if stats.skipped > 0 {
        println!(
            "   {}",
            warning(&format!(
                "skipped:          {} (unsupported extension)",
                stats.skipped
            ))
        );
    }
    println!(
        "   {}",
        dim(&format!("{:.2}s", started.elapsed().as_secs_f64()))
    );

    ExitCode::SUCCESS
}
