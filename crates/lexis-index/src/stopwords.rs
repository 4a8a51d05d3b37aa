//! Stopword sets used by the normalizer.
//!
//! Stopwords come from two places: the language lists bundled with the `stop-words`
//! crate (Stopwords ISO), and newline-separated word files named in the configuration.
//! All words are stored lowercase, matching the normalizer's cleaned tokens.

use std::{collections::HashSet, fs, path::Path};

use stop_words::LANGUAGE;

use crate::IndexError;

/// A set of words excluded from indexing and querying.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    /// Lowercased stopwords.
    words: HashSet<String>,
}

impl Stopwords {
    /// Creates an empty stopword set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the bundled lists for each named language.
    pub fn from_languages<S: AsRef<str>>(languages: &[S]) -> Result<Self, IndexError> {
        let mut stopwords = Self::empty();
        for name in languages {
            let language = parse_stopword_language(name.as_ref())?;
            stopwords.extend(stop_words::get(language).iter().copied());
        }
        Ok(stopwords)
    }

    /// Adds every non-empty line of a word file.
    ///
    /// A missing or unreadable file is an error.
    pub fn with_file(mut self, path: &Path) -> Result<Self, IndexError> {
        let content = fs::read_to_string(path).map_err(|source| IndexError::Stopwords {
            path: path.to_path_buf(),
            source,
        })?;
        self.extend(content.lines().map(str::trim).filter(|l| !l.is_empty()));
        Ok(self)
    }

    /// Adds words to the set.
    pub fn extend<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        self.words.extend(words.into_iter().map(str::to_lowercase));
    }

    /// Removes words from the set.
    pub fn remove<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        for word in words {
            self.words.remove(&word.to_lowercase());
        }
    }

    /// Checks if a cleaned token is a stopword.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Number of distinct stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the set holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Maps a language name onto a bundled stopword list.
fn parse_stopword_language(name: &str) -> Result<LANGUAGE, IndexError> {
    match name.to_lowercase().as_str() {
        "arabic" => Ok(LANGUAGE::Arabic),
        "danish" => Ok(LANGUAGE::Danish),
        "dutch" => Ok(LANGUAGE::Dutch),
        "english" => Ok(LANGUAGE::English),
        "finnish" => Ok(LANGUAGE::Finnish),
        "french" => Ok(LANGUAGE::French),
        "german" => Ok(LANGUAGE::German),
        "greek" => Ok(LANGUAGE::Greek),
        "hungarian" => Ok(LANGUAGE::Hungarian),
        "italian" => Ok(LANGUAGE::Italian),
        "norwegian" => Ok(LANGUAGE::Norwegian),
        "portuguese" => Ok(LANGUAGE::Portuguese),
        "romanian" => Ok(LANGUAGE::Romanian),
        "russian" => Ok(LANGUAGE::Russian),
        "spanish" => Ok(LANGUAGE::Spanish),
        "swedish" => Ok(LANGUAGE::Swedish),
        "turkish" => Ok(LANGUAGE::Turkish),
        other => Err(IndexError::InvalidLanguage(other.to_string())),
    }
}
