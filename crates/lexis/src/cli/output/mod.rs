//! Rendering and JSON serialization for CLI output.

use std::{path::Path, process::ExitCode};

use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL_CONDENSED};
use lexis_index::SearchResults;
use serde::Serialize;

/// ANSI color codes for terminal output.
mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow text (for warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// One hit in JSON output.
#[derive(Serialize)]
struct JsonHit<'a> {
    /// Document display name.
    name: &'a str,
    /// Source path.
    path: &'a Path,
    /// Cosine score.
    score: f64,
}

/// JSON output for `lexis search`.
#[derive(Serialize)]
struct JsonSearchOutput<'a> {
    /// Candidates before the limit was applied.
    results: usize,
    /// Query time in milliseconds.
    time: f64,
    /// Ranked hits.
    hits: Vec<JsonHit<'a>>,
}

/// Prints results as pretty JSON.
pub fn output_json(results: &SearchResults) -> ExitCode {
    let output = JsonSearchOutput {
        results: results.result_count,
        time: results.elapsed.as_secs_f64() * 1000.0,
        hits: results
            .hits
            .iter()
            .map(|hit| JsonHit {
                name: &hit.name,
                path: &hit.path,
                score: hit.score,
            })
            .collect(),
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the ranked results table.
pub fn results_table(results: &SearchResults) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Score", "Name", "Path"]);
    for (rank, hit) in results.hits.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", hit.score)),
            Cell::new(&hit.name),
            Cell::new(hit.path.display()),
        ]);
    }
    table
}

/// Prints results as a table followed by a summary line.
pub fn output_table(results: &SearchResults) {
    if results.hits.is_empty() {
        println!("{}", dim("No results found."));
    } else {
        println!("{}", results_table(results));
    }
    println!("{}", dim(&summary(results)));
}

/// One-line result count and timing.
fn summary(results: &SearchResults) -> String {
    let millis = results.elapsed.as_secs_f64() * 1000.0;
    let noun = if results.result_count == 1 {
        "result"
    } else {
        "results"
    };
    if results.hits.len() < results.result_count {
        format!(
            "{} {noun}, showing {} ({millis:.2} ms)",
            results.result_count,
            results.hits.len()
        )
    } else {
        format!("{} {noun} ({millis:.2} ms)", results.result_count)
    }
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::Duration};

    use lexis_index::SearchHit;

    use super::*;

    fn results(count: usize, shown: usize) -> SearchResults {
        SearchResults {
            hits: (0..shown)
                .map(|i| SearchHit {
                    document_id: format!("d{i}"),
                    name: format!("d{i}.txt"),
                    path: PathBuf::from(format!("/corpus/d{i}.txt")),
                    score: 1.0 / (i + 1) as f64,
                })
                .collect(),
            result_count: count,
            elapsed: Duration::from_micros(1500),
        }
    }

    #[test]
    fn summary_mentions_truncation() {
        assert_eq!(summary(&results(1, 1)), "1 result (1.50 ms)");
        assert_eq!(summary(&results(5, 2)), "5 results, showing 2 (1.50 ms)");
        assert_eq!(summary(&results(0, 0)), "0 results (1.50 ms)");
    }

    #[test]
    fn table_lists_hits_in_rank_order() {
        let rendered = results_table(&results(2, 2)).to_string();
        let first = rendered.find("d0.txt").unwrap();
        let second = rendered.find("d1.txt").unwrap();
        assert!(first < second);
        assert!(rendered.contains("1.0000"));
        assert!(rendered.contains("0.5000"));
    }
}
