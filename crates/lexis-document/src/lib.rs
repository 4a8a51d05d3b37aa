//! Structured document readers for lexis.
//!
//! A document reader turns one source file into a [`ParsedDocument`]: a stable identifier
//! plus a mapping from field name to plain field text. The indexer only ever sees that
//! mapping; how a format stores its fields is this crate's concern.
//!
//! Supported formats:
//! - JSON records (`.json`) with `id`, `title`, `abstract`, `body`, `journal`, `publisher`,
//!   `authors` and `categories` keys
//! - Markdown (`.md`, `.markdown`) with YAML frontmatter carrying the structured fields
//! - Plain text (`.txt`), indexed as a single `body` field
//!
//! Repeated list fields (authors, categories) become one field per entry, suffixed with its
//! position (`authors_0`, `authors_1`, ...) so entries never collide.

#![warn(missing_docs)]

mod error;
mod frontmatter;
mod json;
mod markdown;

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

pub use error::DocumentError;
pub use frontmatter::{Frontmatter, parse_frontmatter};
pub use json::parse_json;
pub use markdown::{markdown_to_text, parse_markdown};

/// Field holding the document title.
pub const TITLE: &str = "title";
/// Field holding the abstract.
pub const ABSTRACT: &str = "abstract";
/// Field holding the main body text.
pub const BODY: &str = "body";
/// Field holding the journal name.
pub const JOURNAL: &str = "journal";
/// Field holding the publisher name.
pub const PUBLISHER: &str = "publisher";
/// Prefix of the per-author fields.
pub const AUTHORS: &str = "authors";
/// Prefix of the per-category fields.
pub const CATEGORIES: &str = "categories";

/// Mapping from field name to plain field text, ordered by field name.
pub type FieldMap = BTreeMap<String, String>;

/// A document read from disk, ready for term accumulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Stable document identifier.
    pub id: String,
    /// Path the document was read from.
    pub path: PathBuf,
    /// Field name -> field text.
    pub fields: FieldMap,
}

/// Reads structured documents from disk.
///
/// Implementations must be deterministic: reading the same file twice yields the same
/// fields, otherwise document frequencies computed over a collection are meaningless.
pub trait DocumentReader {
    /// Returns true if this reader can handle the file at `path`.
    fn supports(&self, path: &Path) -> bool;

    /// Reads and parses the document at `path`.
    fn read(&self, path: &Path) -> Result<ParsedDocument, DocumentError>;
}

/// The file formats handled by [`CollectionReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON record.
    Json,
    /// Markdown with optional frontmatter.
    Markdown,
    /// Plain text.
    Text,
}

impl Format {
    /// Determines the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "md" | "markdown" => Some(Self::Markdown),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Default reader dispatching on file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionReader;

impl DocumentReader for CollectionReader {
    fn supports(&self, path: &Path) -> bool {
        Format::from_path(path).is_some()
    }

    fn read(&self, path: &Path) -> Result<ParsedDocument, DocumentError> {
        let format =
            Format::from_path(path).ok_or_else(|| DocumentError::UnsupportedFileType {
                path: path.to_path_buf(),
            })?;

        let content = fs::read_to_string(path).map_err(|source| DocumentError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        match format {
            Format::Json => parse_json(&content, path),
            Format::Markdown => parse_markdown(&content, path),
            Format::Text => parse_text(&content, path),
        }
    }
}

/// Parses a plain text file: the whole content is the `body` field.
pub fn parse_text(content: &str, path: &Path) -> Result<ParsedDocument, DocumentError> {
    let mut fields = FieldMap::new();
    fields.insert(BODY.to_string(), content.to_string());
    Ok(ParsedDocument {
        id: id_from_path(path)?,
        path: path.to_path_buf(),
        fields,
    })
}

/// Inserts one field per entry of a repeated list field (`authors_0`, `authors_1`, ...).
pub fn insert_repeated(fields: &mut FieldMap, prefix: &str, values: &[String]) {
    for (i, value) in values.iter().enumerate() {
        fields.insert(format!("{prefix}_{i}"), value.clone());
    }
}

/// Inserts a field when the value is present.
fn insert_optional(fields: &mut FieldMap, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        fields.insert(name.to_string(), value.to_string());
    }
}

/// Falls back to the file stem as document identifier.
fn id_from_path(path: &Path) -> Result<String, DocumentError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DocumentError::MissingId {
            path: path.to_path_buf(),
        })
}

/// Picks an explicit identifier if non-empty, else the file stem.
fn resolve_id(explicit: Option<&str>, path: &Path) -> Result<String, DocumentError> {
    match explicit.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => id_from_path(path),
    }
}
