//! External-memory inverted index and vector-space search for lexis.
//!
//! This crate builds and queries a disk-resident, term-weighted inverted index:
//! - Text normalization shared by documents and queries (stopwords, stemming)
//! - Field-weighted term accumulation with bounded memory: once the in-memory vocabulary
//!   reaches the spill threshold it is written out as a partial index
//! - Pairwise merging of partial indexes into the final vocabulary and postings files
//! - A second pass computing each document's tf-idf vector norm
//! - Cosine-ranked search with optional type-hint and synonym expansion
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use lexis_config::Config;
//! use lexis_index::{IndexContext, Indexer, SearchParams, Searcher, SilentReporter};
//!
//! let config = Config::default();
//! let context = IndexContext::from_config(&config).unwrap();
//! let dir = Path::new(".lexis/index");
//!
//! Indexer::new(&context, dir)
//!     .index(Path::new("corpus"), &mut SilentReporter)
//!     .unwrap();
//!
//! let searcher = Searcher::open(&context, dir).unwrap();
//! let results = searcher
//!     .search("heart disease", None, &SearchParams::default())
//!     .unwrap();
//! for hit in results.hits {
//!     println!("{:.4} {}", hit.score, hit.name);
//! }
//! ```

#![warn(missing_docs)]

mod accumulator;
mod analyzer;
mod codec;
mod context;
mod discovery;
mod documents;
mod error;
mod fields;
mod indexer;
mod location;
mod manifest;
mod merge;
mod norms;
mod partial;
mod search;
mod status;
mod stemmer;
mod stopwords;
mod vocabulary;

pub use accumulator::{Accumulator, DocumentMeta, DocumentTerm};
pub use analyzer::{Normalizer, Term};
pub use context::IndexContext;
pub use discovery::{CollectionFile, discover_documents, walk_collection};
pub use documents::{DocumentRecord, DocumentStore, read_documents};
pub use error::IndexError;
pub use fields::{DEFAULT_WEIGHT, FieldWeights, base_name};
pub use indexer::{IndexStats, Indexer, ProgressReporter, SilentReporter};
pub use location::IndexFiles;
pub use manifest::{FORMAT_VERSION, Manifest};
pub use merge::MergeStats;
pub use norms::{backfill_norms, idf};
pub use search::{
    QueryExpansion, SearchHit, SearchParams, SearchResults, Searcher, Thesaurus,
    TypeHintPolicy, WordNetThesaurus,
};
pub use status::{IndexStatus, detect_index_status, read_manifest};
pub use stemmer::{IdentityStemmer, NO_STEMMER, SnowballStemmer, Stemmer, stemmer_from_name};
pub use stopwords::Stopwords;
pub use vocabulary::{IndexedPosting, VocabularyEntry, read_vocabulary};
