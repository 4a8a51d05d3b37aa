//! Vector-space search over a built index.
//!
//! The vocabulary is loaded into memory when the searcher opens; postings and document
//! records are read from disk per query. Documents are ranked by the cosine between the
//! query's tf-idf vector and each document's, using the norms written at build time.

mod expand;
mod types;

use std::{
    collections::{BTreeMap, HashMap, hash_map::Entry},
    fs::File,
    io::{BufReader, Seek, SeekFrom},
    path::{Path, PathBuf},
    time::Instant,
};

pub use expand::{QueryExpansion, Thesaurus, TypeHintPolicy, WordNetThesaurus};
use parking_lot::Mutex;
use tracing::{debug, info};
pub use types::{SearchHit, SearchParams, SearchResults};

use crate::{
    IndexError,
    analyzer::Term,
    context::IndexContext,
    documents::DocumentStore,
    location::IndexFiles,
    norms::idf,
    status::{IndexStatus, detect_index_status},
    vocabulary::{VocabularyEntry, read_run, read_vocabulary},
};

/// A document that shares at least one term with the query.
struct Candidate {
    /// Source path from the documents file.
    path: PathBuf,
    /// Document vector norm.
    norm: f64,
    /// Running dot product with the query vector.
    dot: f64,
}

/// Answers free-text queries against a complete index.
///
/// Postings and documents handles sit behind mutexes so one searcher can be shared across
/// threads. Queries take the postings lock, then the documents lock, and hold both for the
/// whole query.
pub struct Searcher<'c> {
    /// Analysis and expansion shared with the indexer.
    context: &'c IndexContext,
    /// Index file layout.
    files: IndexFiles,
    /// Term -> postings run.
    vocabulary: HashMap<Term, VocabularyEntry>,
    /// Number of documents in the collection.
    total_documents: u64,
    /// Final postings file.
    postings: Mutex<BufReader<File>>,
    /// Documents file.
    documents: Mutex<DocumentStore>,
}

impl<'c> Searcher<'c> {
    /// Opens the index in `dir`.
    ///
    /// The index must be complete: a missing manifest means the last build never finished.
    pub fn open(context: &'c IndexContext, dir: &Path) -> Result<Self, IndexError> {
        let files = IndexFiles::new(dir);
        match detect_index_status(&files) {
            IndexStatus::Missing => {
                return Err(IndexError::OpenIndex {
                    path: dir.to_path_buf(),
                    message: "no index found".to_string(),
                });
            }
            IndexStatus::Incomplete => {
                return Err(IndexError::IncompleteIndex {
                    path: dir.to_path_buf(),
                });
            }
            IndexStatus::Complete => {}
        }

        let vocabulary: HashMap<Term, VocabularyEntry> =
            read_vocabulary(&files.vocabulary)?.into_iter().collect();
        let documents = DocumentStore::open(&files.documents)?;
        let total_documents = documents.count();
        let postings = BufReader::new(File::open(&files.postings)?);

        info!(
            dir = %dir.display(),
            terms = vocabulary.len(),
            documents = total_documents,
            "opened index"
        );
        Ok(Self {
            context,
            files,
            vocabulary,
            total_documents,
            postings: Mutex::new(postings),
            documents: Mutex::new(documents),
        })
    }

    /// Number of documents in the collection.
    pub fn document_count(&self) -> u64 {
        self.total_documents
    }

    /// Number of distinct terms in the vocabulary.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vocabulary entry for a normalized term.
    pub fn entry(&self, term: &str) -> Option<VocabularyEntry> {
        self.vocabulary.get(term).copied()
    }

    /// Ranks documents against `query`.
    ///
    /// `hint` is an optional query type that enables expansion. Terms missing from the
    /// vocabulary contribute nothing; a query with no terms returns no hits. Exceeding
    /// `params.deadline` while reading postings is an error.
    pub fn search(
        &self,
        query: &str,
        hint: Option<&str>,
        params: &SearchParams,
    ) -> Result<SearchResults, IndexError> {
        let started = Instant::now();
        let tokens = self
            .context
            .expansion()
            .query_terms(self.context.normalizer(), query, hint);

        let mut counts: BTreeMap<Term, u32> = BTreeMap::new();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }
        let Some(max_count) = counts.values().copied().max() else {
            debug!(query, "query has no terms");
            return Ok(SearchResults::empty(started.elapsed()));
        };

        let mut postings = self.postings.lock();
        let mut documents = self.documents.lock();
        let mut candidates: HashMap<String, Candidate> = HashMap::new();
        let mut query_norm_sq = 0.0_f64;

        for (term, count) in &counts {
            let Some(entry) = self.vocabulary.get(term) else {
                continue;
            };
            let term_idf = idf(self.total_documents, entry.document_frequency);
            let query_weight = f64::from(*count) / f64::from(max_count) * term_idf;
            query_norm_sq += query_weight * query_weight;

            postings.seek(SeekFrom::Start(entry.postings_offset))?;
            read_run(&mut *postings, &self.files.postings, entry, |posting| {
                if let Some(deadline) = params.deadline
                    && started.elapsed() > deadline
                {
                    return Err(IndexError::DeadlineExceeded {
                        elapsed: started.elapsed(),
                    });
                }
                let document_weight = posting.weight * term_idf;
                let candidate = match candidates.entry(posting.document_id) {
                    Entry::Occupied(existing) => existing.into_mut(),
                    Entry::Vacant(slot) => {
                        let record = documents.read_at(posting.document_pointer, slot.key())?;
                        slot.insert(Candidate {
                            path: record.path,
                            norm: record.norm,
                            dot: 0.0,
                        })
                    }
                };
                candidate.dot += query_weight * document_weight;
                Ok(())
            })?;
        }
        drop(documents);
        drop(postings);

        let query_norm = query_norm_sq.sqrt();
        let mut hits: Vec<SearchHit> = candidates
            .into_iter()
            .map(|(document_id, candidate)| {
                let score = if candidate.norm > 0.0 && query_norm > 0.0 {
                    candidate.dot / (candidate.norm * query_norm)
                } else {
                    0.0
                };
                SearchHit {
                    name: display_name(&candidate.path, &document_id),
                    document_id,
                    path: candidate.path,
                    score,
                }
            })
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });

        let result_count = hits.len();
        if let Some(limit) = params.limit {
            hits.truncate(limit);
        }
        let elapsed = started.elapsed();
        debug!(
            query,
            terms = counts.len(),
            results = result_count,
            elapsed_ms = elapsed.as_millis(),
            "search complete"
        );
        Ok(SearchResults {
            hits,
            result_count,
            elapsed,
        })
    }
}

/// File name of the source path, falling back to the document id.
fn display_name(path: &Path, document_id: &str) -> String {
    path.file_name().map_or_else(
        || document_id.to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
