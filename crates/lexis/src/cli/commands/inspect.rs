//! Implementation of `lexis inspect`.

use std::process::ExitCode;

use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL_CONDENSED};
use lexis_document::{CollectionReader, DocumentReader, ParsedDocument};
use lexis_index::IndexContext;

use crate::cli::{
    args::InspectCommand,
    context::CommandContext,
    output::{dim, header},
};

/// Shows how a document is split into fields and analyzed into terms.
pub fn run(ctx: &CommandContext, cmd: &InspectCommand) -> ExitCode {
    let path = ctx.cwd.join(&cmd.file);
    let reader = CollectionReader;
    if !reader.supports(&path) {
        eprintln!("error: unsupported file type: {}", path.display());
        eprintln!("Supported types: .json, .md, .markdown, .txt");
        return ExitCode::FAILURE;
    }

    let document = match reader.read(&path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let context = match ctx.index_context() {
        Ok(context) => context,
        Err(code) => return code,
    };

    println!("--- {} ---", header(&document.id));
    println!("{}", dim(&document.path.display().to_string()));
    println!("{}", field_table(&context, &document));
    ExitCode::SUCCESS
}

/// One row per field: name, weight, and the analyzed terms.
fn field_table(context: &IndexContext, document: &ParsedDocument) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Field", "Weight", "Terms"]);
    for (field, text) in &document.fields {
        let terms = context.normalizer().analyze(text);
        table.add_row(vec![
            Cell::new(field),
            Cell::new(format!("{:.1}", context.weights().weight(field)))
                .set_alignment(CellAlignment::Right),
            Cell::new(terms.join(" ")),
        ]);
    }
    table
}
