//! lexis: batch-built, disk-resident full-text search.
//!
//! The `lexis` binary builds an on-disk inverted index from a collection of JSON, Markdown
//! and plain text documents, then ranks documents against free-text queries by cosine
//! similarity of weighted term vectors. This crate holds the command-line front end; the
//! indexing and search engine lives in `lexis-index`.

#![warn(missing_docs)]

pub mod cli;
