//! Shared analysis state for indexing and search.
//!
//! An [`IndexContext`] is built once per process from the resolved [`Config`] and borrowed by
//! the [`Indexer`](crate::Indexer) and [`Searcher`](crate::Searcher). Both must use the same
//! normalizer, otherwise query terms will not line up with index terms.

use lexis_config::Config;
use tracing::debug;

use crate::{
    IndexError,
    analyzer::Normalizer,
    fields::FieldWeights,
    search::{QueryExpansion, SearchParams, TypeHintPolicy, WordNetThesaurus},
    stemmer::stemmer_from_name,
    stopwords::Stopwords,
};

/// Label recorded in the manifest for analysis settings not taken from configuration.
const CUSTOM: &str = "custom";

/// Default spill threshold, in distinct terms.
const DEFAULT_SPILL_THRESHOLD: usize = 1_000_000;

/// Everything indexing and search need besides the index directory.
pub struct IndexContext {
    /// Text pipeline shared by documents and queries.
    normalizer: Normalizer,
    /// Field multipliers.
    weights: FieldWeights,
    /// Distinct terms held in memory before spilling.
    spill_threshold: usize,
    /// Stemmer name, for the manifest.
    stemmer_name: String,
    /// Stopword languages, for the manifest.
    stopword_languages: Vec<String>,
    /// Query expansion applied by the searcher.
    expansion: QueryExpansion,
    /// Search defaults.
    search_defaults: SearchParams,
}

impl IndexContext {
    /// Builds the context described by `config`.
    ///
    /// Loads stopword lists and files, the stemmer, the significant-terms list and the
    /// thesaurus. A configured resource that cannot be loaded is an error.
    pub fn from_config(config: &Config) -> Result<Self, IndexError> {
        let analysis = &config.analysis;
        let mut stopwords = Stopwords::from_languages(&analysis.stopwords)?;
        for path in &analysis.stopword_files {
            stopwords = stopwords.with_file(path)?;
        }
        // Hint types are appended as query terms and must survive indexing.
        stopwords.remove(config.search.hint_types.iter().map(String::as_str));
        let stemmer = stemmer_from_name(&analysis.stemmer)?;

        let search = &config.search;
        let significant_terms = match &search.significant_terms {
            Some(path) => TypeHintPolicy::load_terms(path)?,
            None => Default::default(),
        };
        let thesaurus = match &search.thesaurus {
            Some(path) => {
                let thesaurus = WordNetThesaurus::load(path)?;
                debug!(path = %path.display(), words = thesaurus.len(), "loaded thesaurus");
                Some(Box::new(thesaurus) as Box<_>)
            }
            None => None,
        };
        let expansion = QueryExpansion::new(
            TypeHintPolicy::new(&search.hint_types, significant_terms),
            thesaurus,
        );

        debug!(
            stemmer = %analysis.stemmer,
            stopwords = stopwords.len(),
            "built analysis context"
        );
        Ok(Self {
            normalizer: Normalizer::new(stopwords, stemmer),
            weights: FieldWeights::with_overrides(&config.fields),
            spill_threshold: config.index.spill_threshold.max(1),
            stemmer_name: analysis.stemmer.clone(),
            stopword_languages: analysis.stopwords.clone(),
            expansion,
            search_defaults: SearchParams::from_settings(search),
        })
    }

    /// Creates a context around an explicit normalizer, with default weights and no
    /// query expansion.
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            weights: FieldWeights::default(),
            spill_threshold: DEFAULT_SPILL_THRESHOLD,
            stemmer_name: CUSTOM.to_string(),
            stopword_languages: vec![CUSTOM.to_string()],
            expansion: QueryExpansion::default(),
            search_defaults: SearchParams::default(),
        }
    }

    /// Sets the spill threshold. Values below 1 are raised to 1.
    pub fn with_spill_threshold(mut self, threshold: usize) -> Self {
        self.spill_threshold = threshold.max(1);
        self
    }

    /// Replaces the field weights.
    pub fn with_field_weights(mut self, weights: FieldWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replaces the query expansion.
    pub fn with_expansion(mut self, expansion: QueryExpansion) -> Self {
        self.expansion = expansion;
        self
    }

    /// The shared text pipeline.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Field multipliers.
    pub fn weights(&self) -> &FieldWeights {
        &self.weights
    }

    /// Distinct terms held in memory before a partial index is written.
    pub fn spill_threshold(&self) -> usize {
        self.spill_threshold
    }

    /// Stemmer name recorded in the manifest.
    pub fn stemmer_name(&self) -> &str {
        &self.stemmer_name
    }

    /// Stopword languages recorded in the manifest.
    pub fn stopword_languages(&self) -> &[String] {
        &self.stopword_languages
    }

    /// Query expansion applied by the searcher.
    pub fn expansion(&self) -> &QueryExpansion {
        &self.expansion
    }

    /// Search parameters from configuration.
    pub fn search_defaults(&self) -> &SearchParams {
        &self.search_defaults
    }
}
