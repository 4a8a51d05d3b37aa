//! Implementation of `lexis status`.

use std::process::ExitCode;

use lexis_config::discover_config_files;
use lexis_index::{IndexFiles, IndexStatus, detect_index_status, read_manifest};

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Shows configuration files, index state, and the effective settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);
    println!("{}", subheader("Config files:"));
    if config_files.is_empty() {
        println!("   {}", dim("(none, using defaults)"));
    }
    for path in &config_files {
        println!("   {}", path.display());
    }
    println!();

    let index_dir = ctx.index_dir();
    let files = IndexFiles::new(&index_dir);
    let status = detect_index_status(&files);
    let description = match status {
        IndexStatus::Incomplete => warning(status.description()),
        _ => status.description().to_string(),
    };
    println!("{}", subheader("Index:"));
    println!("   {description} {}", dim(&format!("({})", index_dir.display())));

    match read_manifest(&files) {
        Ok(Some(manifest)) => {
            println!("   collection:       {}", manifest.collection.display());
            println!("   documents:        {}", manifest.documents);
            println!("   terms:            {}", manifest.terms);
            println!("   partial indexes:  {}", manifest.partial_indexes);
            println!("   merges:           {}", manifest.merges);
            println!("   stemmer:          {}", manifest.stemmer);
            if !manifest.stopwords.is_empty() {
                println!("   stopwords:        {}", manifest.stopwords.join(", "));
            }
        }
        Ok(None) => {
            if status == IndexStatus::Missing {
                println!("   {}", dim("Run 'lexis index <path>' to build it."));
            }
        }
        Err(e) => {
            eprintln!("error: failed to read manifest: {e}");
            return ExitCode::FAILURE;
        }
    }
    println!();

    match ctx.config.settings_to_toml() {
        Ok(toml) => {
            println!("{}", subheader("Effective settings:"));
            for line in toml.lines() {
                println!("   {line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize settings: {e}");
            ExitCode::FAILURE
        }
    }
}
