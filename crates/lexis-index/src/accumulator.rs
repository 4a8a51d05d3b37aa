//! In-memory term accumulation between spills.
//!
//! The accumulator holds the postings of every document read since the last spill, keyed by
//! term in sorted order so a spill can stream them straight into a partial index. The
//! document catalog (id, path, max weighted tf) lives for the whole run: it detects duplicate
//! identifiers and later becomes the documents file.

use std::{
    collections::{BTreeMap, btree_map::Entry},
    path::{Path, PathBuf},
};

use lexis_document::FieldMap;
use tracing::{debug, warn};

use crate::{
    IndexError,
    analyzer::{Normalizer, Term},
    fields::{FieldWeights, base_name},
};

/// Occurrences of one term in one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTerm {
    /// Identifier of the document.
    pub document_id: String,
    /// Number of occurrences across all fields.
    pub raw_tf: u32,
    /// Highest field multiplier the term appeared under.
    pub multiplier: f64,
    /// Occurrences per base field name.
    pub field_counts: BTreeMap<String, u32>,
}

impl DocumentTerm {
    /// Creates an empty entry for a document.
    fn new(document_id: &str) -> Self {
        Self {
            document_id: document_id.to_string(),
            raw_tf: 0,
            multiplier: 0.0,
            field_counts: BTreeMap::new(),
        }
    }

    /// Term frequency scaled by the field multiplier.
    pub fn weighted_tf(&self) -> f64 {
        f64::from(self.raw_tf) * self.multiplier
    }
}

/// Per-document bookkeeping kept for the whole indexing run.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMeta {
    /// Path the document was read from.
    pub path: PathBuf,
    /// Largest weighted tf of any term in the document; 0 when it has no terms.
    pub max_weighted_tf: f64,
}

/// Collects term postings until a spill.
pub struct Accumulator<'a> {
    /// Text normalizer.
    normalizer: &'a Normalizer,
    /// Field multipliers.
    weights: &'a FieldWeights,
    /// Term -> postings in document insertion order, since the last spill.
    terms: BTreeMap<Term, Vec<DocumentTerm>>,
    /// Every document seen this run, by id.
    documents: BTreeMap<String, DocumentMeta>,
}

impl<'a> Accumulator<'a> {
    /// Creates an empty accumulator.
    pub fn new(normalizer: &'a Normalizer, weights: &'a FieldWeights) -> Self {
        Self {
            normalizer,
            weights,
            terms: BTreeMap::new(),
            documents: BTreeMap::new(),
        }
    }

    /// Adds one document's fields.
    ///
    /// Returns the number of distinct terms the document contributed. A document whose id
    /// was already added is an error.
    pub fn add_document(
        &mut self,
        id: &str,
        path: &Path,
        fields: &FieldMap,
    ) -> Result<usize, IndexError> {
        let slot = match self.documents.entry(id.to_string()) {
            Entry::Occupied(existing) => {
                return Err(IndexError::DuplicateDocument {
                    id: id.to_string(),
                    first: existing.get().path.clone(),
                    second: path.to_path_buf(),
                });
            }
            Entry::Vacant(slot) => slot,
        };

        let mut local: BTreeMap<Term, DocumentTerm> = BTreeMap::new();
        for (field, text) in fields {
            let multiplier = self.weights.weight(field);
            let base = base_name(field);
            for term in self.normalizer.analyze(text) {
                let entry = local
                    .entry(term)
                    .or_insert_with(|| DocumentTerm::new(id));
                entry.raw_tf += 1;
                entry.multiplier = entry.multiplier.max(multiplier);
                *entry.field_counts.entry(base.to_string()).or_insert(0) += 1;
            }
        }

        let max_weighted_tf = local
            .values()
            .map(DocumentTerm::weighted_tf)
            .fold(0.0, f64::max);
        slot.insert(DocumentMeta {
            path: path.to_path_buf(),
            max_weighted_tf,
        });

        let distinct = local.len();
        if distinct == 0 {
            warn!(id, path = %path.display(), "document has no indexable terms");
        } else {
            debug!(id, terms = distinct, "accumulated document");
        }

        for (term, posting) in local {
            self.terms.entry(term).or_default().push(posting);
        }
        Ok(distinct)
    }

    /// Number of distinct terms held since the last spill.
    pub fn distinct_terms(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if the in-memory terms reached the spill threshold.
    pub fn should_spill(&self, threshold: usize) -> bool {
        !self.terms.is_empty() && self.terms.len() >= threshold
    }

    /// Terms and their postings in sorted order.
    pub fn terms(&self) -> impl Iterator<Item = (&Term, &[DocumentTerm])> {
        self.terms.iter().map(|(term, postings)| (term, postings.as_slice()))
    }

    /// Looks up a document's bookkeeping.
    pub fn document(&self, id: &str) -> Option<&DocumentMeta> {
        self.documents.get(id)
    }

    /// Every document seen this run, in id order.
    pub fn documents(&self) -> &BTreeMap<String, DocumentMeta> {
        &self.documents
    }

    /// Drops the accumulated terms after a spill, keeping the document catalog.
    pub fn clear_terms(&mut self) {
        self.terms.clear();
    }
}

#[cfg(test)]
mod test {
    use lexis_document::{BODY, TITLE};

    use super::*;
    use crate::{stemmer::IdentityStemmer, stopwords::Stopwords};

    fn normalizer() -> Normalizer {
        Normalizer::new(Stopwords::empty(), Box::new(IdentityStemmer))
    }

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn counts_and_multipliers() {
        let normalizer = normalizer();
        let weights = FieldWeights::default();
        let mut acc = Accumulator::new(&normalizer, &weights);

        let doc = fields(&[(TITLE, "heart"), (BODY, "heart failure heart")]);
        let added = acc.add_document("d1", Path::new("/c/d1.json"), &doc).unwrap();
        assert_eq!(added, 2);

        let terms: Vec<_> = acc.terms().collect();
        let (term, postings) = terms[1];
        assert_eq!(term, "heart");
        assert_eq!(postings[0].raw_tf, 3);
        assert_eq!(postings[0].multiplier, 3.0);
        assert_eq!(postings[0].field_counts[TITLE], 1);
        assert_eq!(postings[0].field_counts[BODY], 2);

        let meta = acc.document("d1").unwrap();
        assert_eq!(meta.max_weighted_tf, 9.0);
    }

    #[test]
    fn postings_keep_insertion_order() {
        let normalizer = normalizer();
        let weights = FieldWeights::default();
        let mut acc = Accumulator::new(&normalizer, &weights);

        for id in ["z", "a", "m"] {
            let doc = fields(&[(BODY, "lung")]);
            acc.add_document(id, Path::new(id), &doc).unwrap();
        }
        let (_, postings) = acc.terms().next().unwrap();
        let ids: Vec<_> = postings.iter().map(|p| p.document_id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn duplicate_id_is_fatal() {
        let normalizer = normalizer();
        let weights = FieldWeights::default();
        let mut acc = Accumulator::new(&normalizer, &weights);

        let doc = fields(&[(BODY, "text")]);
        acc.add_document("same", Path::new("/c/a.txt"), &doc).unwrap();
        let err = acc
            .add_document("same", Path::new("/c/b/a.txt"), &doc)
            .unwrap_err();
        match err {
            IndexError::DuplicateDocument { id, first, second } => {
                assert_eq!(id, "same");
                assert_eq!(first, PathBuf::from("/c/a.txt"));
                assert_eq!(second, PathBuf::from("/c/b/a.txt"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn spill_policy_and_clear() {
        let normalizer = normalizer();
        let weights = FieldWeights::default();
        let mut acc = Accumulator::new(&normalizer, &weights);
        assert!(!acc.should_spill(1));

        acc.add_document("d1", Path::new("d1"), &fields(&[(BODY, "one two")]))
            .unwrap();
        assert!(acc.should_spill(2));
        assert!(!acc.should_spill(3));

        acc.clear_terms();
        assert_eq!(acc.distinct_terms(), 0);
        assert!(acc.document("d1").is_some());
    }

    #[test]
    fn empty_document_is_registered() {
        let normalizer = normalizer();
        let weights = FieldWeights::default();
        let mut acc = Accumulator::new(&normalizer, &weights);

        let added = acc
            .add_document("blank", Path::new("blank"), &fields(&[(BODY, "  ")]))
            .unwrap();
        assert_eq!(added, 0);
        assert_eq!(acc.document("blank").unwrap().max_weighted_tf, 0.0);
    }
}
