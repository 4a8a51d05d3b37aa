//! Index status detection.

use crate::{IndexError, location::IndexFiles, manifest::Manifest};

/// Status of the index directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// No index files exist.
    Missing,
    /// Some index files exist but the build never wrote its manifest.
    Incomplete,
    /// All files and the manifest are present.
    Complete,
}

impl IndexStatus {
    /// Returns a human-readable description for display.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Incomplete => "incomplete (rebuild required)",
            Self::Complete => "complete",
        }
    }

    /// Returns true if the index can be searched.
    pub fn is_searchable(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Determines the status of the index in `files.dir`.
pub fn detect_index_status(files: &IndexFiles) -> IndexStatus {
    let present = files.data_files().iter().filter(|p| p.exists()).count();
    let manifest = files.manifest.exists();
    match (present, manifest) {
        (0, false) => IndexStatus::Missing,
        (3, true) => IndexStatus::Complete,
        _ => IndexStatus::Incomplete,
    }
}

/// Reads the manifest of a complete index.
///
/// Returns `None` when the index is missing or incomplete.
pub fn read_manifest(files: &IndexFiles) -> Result<Option<Manifest>, IndexError> {
    if !detect_index_status(files).is_searchable() {
        return Ok(None);
    }
    Manifest::load(&files.manifest).map(Some)
}
