//! Error types for document reading.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when reading documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Unsupported file type.
    #[error("unsupported file type: {path}")]
    UnsupportedFileType {
        /// Path to the unsupported file.
        path: PathBuf,
    },

    /// A JSON document could not be decoded.
    #[error("malformed JSON document {path}: {source}")]
    Json {
        /// Path to the document.
        path: PathBuf,
        /// Underlying decode error.
        source: serde_json::Error,
    },

    /// Markdown frontmatter was present but not valid YAML.
    #[error("malformed frontmatter in {path}: {source}")]
    Frontmatter {
        /// Path to the document.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// No usable document identifier could be determined.
    #[error("document {path} has no identifier")]
    MissingId {
        /// Path to the document.
        path: PathBuf,
    },
}
