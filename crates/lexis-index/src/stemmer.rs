//! Token stemming.
//!
//! The normalizer depends only on the [`Stemmer`] trait. The default implementation runs
//! a single token through Tantivy's Snowball stemmer filter; [`IdentityStemmer`] leaves
//! tokens untouched.

use parking_lot::Mutex;
use tantivy::tokenizer::{
    Language, RawTokenizer, Stemmer as SnowballFilter, TextAnalyzer, TokenStream,
};

use crate::IndexError;

/// Name selecting the identity stemmer.
pub const NO_STEMMER: &str = "none";

/// Reduces a token to its stem.
pub trait Stemmer: Send + Sync {
    /// Returns the stem of `token`.
    fn stem(&self, token: &str) -> String;
}

/// Leaves tokens unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Snowball stemmer for one language, built once and reused.
pub struct SnowballStemmer {
    /// Language the stemmer was built for.
    language: Language,
    /// Analyzer treating its whole input as one token, then stemming it.
    analyzer: Mutex<TextAnalyzer>,
}

impl SnowballStemmer {
    /// Creates a stemmer for the given language.
    pub fn new(language: Language) -> Self {
        let analyzer = TextAnalyzer::builder(RawTokenizer::default())
            .filter(SnowballFilter::new(language))
            .build();
        Self {
            language,
            analyzer: Mutex::new(analyzer),
        }
    }

    /// Language this stemmer was built for.
    pub fn language(&self) -> Language {
        self.language
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, token: &str) -> String {
        let mut analyzer = self.analyzer.lock();
        let mut stream = analyzer.token_stream(token);
        if stream.advance() {
            stream.token().text.clone()
        } else {
            token.to_string()
        }
    }
}

/// Builds a stemmer from its configured name.
///
/// `none` selects [`IdentityStemmer`]; anything else must name a Snowball language.
pub fn stemmer_from_name(name: &str) -> Result<Box<dyn Stemmer>, IndexError> {
    if name.eq_ignore_ascii_case(NO_STEMMER) {
        return Ok(Box::new(IdentityStemmer));
    }
    Ok(Box::new(SnowballStemmer::new(parse_language(name)?)))
}

/// Parses a stemmer language string into a Tantivy `Language`.
///
/// Supports lowercase language names matching Tantivy's `Language` enum.
pub fn parse_language(name: &str) -> Result<Language, IndexError> {
    match name.to_lowercase().as_str() {
        "arabic" => Ok(Language::Arabic),
        "danish" => Ok(Language::Danish),
        "dutch" => Ok(Language::Dutch),
        "english" => Ok(Language::English),
        "finnish" => Ok(Language::Finnish),
        "french" => Ok(Language::French),
        "german" => Ok(Language::German),
        "greek" => Ok(Language::Greek),
        "hungarian" => Ok(Language::Hungarian),
        "italian" => Ok(Language::Italian),
        "norwegian" => Ok(Language::Norwegian),
        "portuguese" => Ok(Language::Portuguese),
        "romanian" => Ok(Language::Romanian),
        "russian" => Ok(Language::Russian),
        "spanish" => Ok(Language::Spanish),
        "swedish" => Ok(Language::Swedish),
        "tamil" => Ok(Language::Tamil),
        "turkish" => Ok(Language::Turkish),
        other => Err(IndexError::InvalidLanguage(other.to_string())),
    }
}
