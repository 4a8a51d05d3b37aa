//! Text normalization shared by indexing and search.
//!
//! Field text and query text go through the same pipeline:
//! 1. `clean` - drop apostrophe-likes, turn ASCII punctuation into spaces, lowercase
//! 2. `tokenize` - split on ASCII whitespace
//! 3. `normalize` - drop stopwords, stem the rest
//!
//! A query term matches a document term exactly when both normalize to the same string,
//! so any change here requires rebuilding the index.

use crate::{stemmer::Stemmer, stopwords::Stopwords};

/// A normalized index term.
pub type Term = String;

/// Characters removed outright, so that `patient's` becomes `patients`.
const STRIPPED: [char; 5] = ['\'', '\u{b4}', '\u{1ffe}', '\u{1fbd}', '"'];

/// Characters tokens are split on.
const SEPARATORS: [char; 5] = ['\t', '\n', '\r', '\x0c', ' '];

/// Turns raw text into index terms.
pub struct Normalizer {
    /// Words dropped before stemming.
    stopwords: Stopwords,
    /// Stemmer applied to every kept token.
    stemmer: Box<dyn Stemmer>,
}

impl Normalizer {
    /// Creates a normalizer from a stopword set and a stemmer.
    pub fn new(stopwords: Stopwords, stemmer: Box<dyn Stemmer>) -> Self {
        Self { stopwords, stemmer }
    }

    /// Removes apostrophe-likes, replaces ASCII punctuation with spaces and lowercases.
    pub fn clean(text: &str) -> String {
        let mut cleaned = String::with_capacity(text.len());
        for c in text.chars() {
            if STRIPPED.contains(&c) {
                continue;
            }
            if c.is_ascii_punctuation() {
                cleaned.push(' ');
            } else {
                cleaned.push(c);
            }
        }
        cleaned.to_lowercase()
    }

    /// Splits cleaned text into tokens, dropping empties.
    pub fn tokenize(cleaned: &str) -> impl Iterator<Item = &str> {
        cleaned.split(SEPARATORS).filter(|t| !t.is_empty())
    }

    /// Maps one cleaned token to its term, or `None` for a stopword.
    pub fn normalize(&self, token: &str) -> Option<Term> {
        if self.stopwords.contains(token) {
            return None;
        }
        Some(self.stemmer.stem(token))
    }

    /// Stems a cleaned token without the stopword check.
    pub fn stem(&self, token: &str) -> Term {
        self.stemmer.stem(token)
    }

    /// Runs the full pipeline, keeping term order and duplicates.
    pub fn analyze(&self, text: &str) -> Vec<Term> {
        let cleaned = Self::clean(text);
        Self::tokenize(&cleaned)
            .filter_map(|token| self.normalize(token))
            .collect()
    }

    /// Cleaned, stopword-filtered words without stemming.
    pub fn surface_words(&self, text: &str) -> Vec<String> {
        let cleaned = Self::clean(text);
        Self::tokenize(&cleaned)
            .filter(|token| !self.stopwords.contains(token))
            .map(str::to_string)
            .collect()
    }

    /// The stopword set in use.
    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }
}

#[cfg(test)]
mod test {
    use tantivy::tokenizer::Language;

    use super::*;
    use crate::stemmer::{IdentityStemmer, SnowballStemmer};

    fn english() -> Normalizer {
        Normalizer::new(
            Stopwords::from_languages(&["english"]).unwrap(),
            Box::new(SnowballStemmer::new(Language::English)),
        )
    }

    #[test]
    fn clean_strips_and_replaces() {
        assert_eq!(Normalizer::clean("Patient's \"Heart\""), "patients heart");
        assert_eq!(Normalizer::clean("lung-disease, (acute)"), "lung disease   acute ");
        assert_eq!(Normalizer::clean("ΚΑΡΔΙΑ"), "καρδια");
    }

    #[test]
    fn tokenize_drops_empties() {
        let tokens: Vec<_> = Normalizer::tokenize("  a\tb\n\nc\x0cd  ").collect();
        assert_eq!(tokens, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn analyze_filters_and_stems() {
        let normalizer = english();
        assert_eq!(
            normalizer.analyze("The patients had chronic diseases"),
            vec!["patient", "chronic", "diseas"]
        );
    }

    #[test]
    fn analyze_keeps_duplicates_in_order() {
        let normalizer = Normalizer::new(Stopwords::empty(), Box::new(IdentityStemmer));
        assert_eq!(
            normalizer.analyze("heart lung heart"),
            vec!["heart", "lung", "heart"]
        );
    }

    #[test]
    fn query_and_document_normalize_identically() {
        let normalizer = english();
        let doc_terms = normalizer.analyze("Chronic Diseases of the Heart.");
        let query_terms = normalizer.analyze("chronic disease heart");
        assert_eq!(doc_terms, query_terms);
    }

    #[test]
    fn surface_words_are_unstemmed() {
        let normalizer = english();
        assert_eq!(
            normalizer.surface_words("The treated diseases"),
            vec!["treated", "diseases"]
        );
    }

    #[test]
    fn only_stopwords_yields_nothing() {
        let normalizer = english();
        assert!(normalizer.analyze("the and of").is_empty());
        assert!(normalizer.analyze("").is_empty());
    }
}
