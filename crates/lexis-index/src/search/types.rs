//! Search parameters and results.

use std::{path::PathBuf, time::Duration};

use lexis_config::SearchSettings;
use serde::Serialize;

/// Per-query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Maximum hits returned; `None` returns every candidate.
    pub limit: Option<usize>,
    /// Time budget for reading postings.
    pub deadline: Option<Duration>,
}

impl SearchParams {
    /// Builds parameters from configured search settings.
    ///
    /// A zero limit or deadline disables it.
    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self {
            limit: (settings.limit > 0).then_some(settings.limit),
            deadline: (settings.deadline_ms > 0)
                .then(|| Duration::from_millis(settings.deadline_ms)),
        }
    }

    /// Returns a copy with a different limit.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Document identifier.
    pub document_id: String,
    /// Display name: the file name of the source path.
    pub name: String,
    /// Source path recorded at index time.
    pub path: PathBuf,
    /// Cosine similarity to the query.
    pub score: f64,
}

/// Ranked hits for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    /// Hits in descending score order, truncated to the limit.
    pub hits: Vec<SearchHit>,
    /// Number of candidate documents before truncation.
    pub result_count: usize,
    /// Wall-clock time spent on the query.
    pub elapsed: Duration,
}

impl SearchResults {
    /// A result with no hits.
    pub fn empty(elapsed: Duration) -> Self {
        Self {
            hits: Vec::new(),
            result_count: 0,
            elapsed,
        }
    }
}
