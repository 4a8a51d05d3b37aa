//! Error types for the lexis-index crate.

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use lexis_document::DocumentError;
use thiserror::Error;

/// Errors that can occur when building or querying the index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to open the index.
    #[error("failed to open index at {path}: {message}")]
    OpenIndex {
        /// Path to the index directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The index files exist but the build never completed.
    #[error("index at {path} is incomplete; run `lexis index` to rebuild it")]
    IncompleteIndex {
        /// Path to the index directory.
        path: PathBuf,
    },

    /// An index file does not match its expected layout.
    #[error("corrupt index file {file} at byte {offset}: {message}")]
    Corrupt {
        /// File that failed to decode.
        file: PathBuf,
        /// Byte offset of the failed read.
        offset: u64,
        /// What was wrong.
        message: String,
    },

    /// A document could not be read.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Two documents in the collection share an identifier.
    #[error("duplicate document id {id}: {first} and {second}")]
    DuplicateDocument {
        /// The shared identifier.
        id: String,
        /// Path of the first document seen.
        first: PathBuf,
        /// Path of the second document.
        second: PathBuf,
    },

    /// Invalid stemmer or stopword language.
    #[error("unsupported language: {0}")]
    InvalidLanguage(String),

    /// A stopword file could not be read.
    #[error("failed to read stopword file {path}: {source}")]
    Stopwords {
        /// Path to the stopword file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A word list used for query expansion could not be read.
    #[error("failed to read word list {path}: {source}")]
    WordList {
        /// Path to the word list.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A string is too long for its on-disk length prefix.
    #[error("string of {len} bytes exceeds the on-disk limit of {} bytes", u16::MAX)]
    StringTooLong {
        /// Byte length of the rejected string.
        len: usize,
    },

    /// A document path cannot be stored because it is not valid UTF-8.
    #[error("document path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// The rejected path.
        path: PathBuf,
    },

    /// A search ran past its deadline.
    #[error("search deadline exceeded after {elapsed:?}")]
    DeadlineExceeded {
        /// Time spent before giving up.
        elapsed: Duration,
    },

    /// The thesaurus could not be loaded.
    #[error("failed to load thesaurus {path}: {message}")]
    Thesaurus {
        /// Path to the thesaurus file.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

impl IndexError {
    /// Creates a `Corrupt` error for a file and offset.
    pub(crate) fn corrupt(file: &Path, offset: u64, message: impl Into<String>) -> Self {
        Self::Corrupt {
            file: file.to_path_buf(),
            offset,
            message: message.into(),
        }
    }
}
