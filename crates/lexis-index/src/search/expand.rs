//! Query expansion.
//!
//! Both expansions are optional. A type hint (for example `diagnosis`) narrows the query to
//! its significant words and adds the hint itself as a term. A thesaurus adds the synonyms of
//! every kept word while a hint is active. With neither configured, query terms are exactly
//! the normalized query text.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fs,
    path::Path,
};

use crate::{
    IndexError,
    analyzer::{Normalizer, Term},
};

/// Source of synonyms for query words.
pub trait Thesaurus: Send + Sync {
    /// Synonyms of a lowercase word, excluding the word itself.
    fn synonyms(&self, word: &str) -> Vec<String>;
}

/// Thesaurus loaded from the WordNet prolog database (`wn_s.pl`).
///
/// Each line is `s(synset_id,w_num,'word',ss_type,sense_number,tag_count).`; words sharing a
/// synset id are synonyms. Only single words made of letters are kept, since multi-word
/// collocations do not map onto one query term.
#[derive(Debug, Default)]
pub struct WordNetThesaurus {
    /// Word -> every other word sharing a synset with it, sorted.
    synonyms: HashMap<String, Vec<String>>,
}

impl WordNetThesaurus {
    /// Loads a `wn_s.pl` file.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let content = fs::read_to_string(path).map_err(|e| IndexError::Thesaurus {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|message| IndexError::Thesaurus {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parses prolog facts. Lines that are not `s(...)` facts are ignored.
    pub fn parse(content: &str) -> Result<Self, String> {
        let mut synsets: HashMap<u64, Vec<String>> = HashMap::new();
        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            let Some(fact) = line.strip_prefix("s(") else {
                continue;
            };
            let (synset, word) =
                parse_fact(fact).ok_or_else(|| format!("malformed fact on line {}", number + 1))?;
            if word.chars().all(char::is_alphabetic) {
                synsets.entry(synset).or_default().push(word.to_lowercase());
            }
        }

        let mut grouped: HashMap<String, BTreeSet<String>> = HashMap::new();
        for words in synsets.values() {
            for word in words {
                let others = grouped.entry(word.clone()).or_default();
                others.extend(words.iter().filter(|w| *w != word).cloned());
            }
        }
        Ok(Self {
            synonyms: grouped
                .into_iter()
                .map(|(word, others)| (word, others.into_iter().collect()))
                .collect(),
        })
    }

    /// Number of words with at least one entry.
    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    /// Returns true if no words were loaded.
    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }
}

impl Thesaurus for WordNetThesaurus {
    fn synonyms(&self, word: &str) -> Vec<String> {
        self.synonyms.get(word).cloned().unwrap_or_default()
    }
}

/// Parses `100001740,1,'entity',n,1,11).` into the synset id and the unquoted word.
fn parse_fact(fact: &str) -> Option<(u64, String)> {
    let (synset, rest) = fact.split_once(',')?;
    let synset = synset.trim().parse().ok()?;
    let (_, rest) = rest.split_once(',')?;
    let quoted = rest.trim_start().strip_prefix('\'')?;

    let mut word = String::new();
    let mut chars = quoted.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                word.push('\'');
            } else {
                return Some((synset, word));
            }
        } else {
            word.push(c);
        }
    }
    None
}

/// Narrows hinted queries to significant words.
#[derive(Debug, Clone, Default)]
pub struct TypeHintPolicy {
    /// Hints that activate the policy, lowercase.
    hint_types: Vec<String>,
    /// Words kept when a hint is active; empty keeps every word.
    significant_terms: HashSet<String>,
}

impl TypeHintPolicy {
    /// Creates a policy from hint names and significant words.
    pub fn new<I, S>(hint_types: I, significant_terms: HashSet<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hint_types: hint_types
                .into_iter()
                .map(|h| h.as_ref().to_lowercase())
                .collect(),
            significant_terms: significant_terms
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }

    /// Reads a newline-separated list of significant words.
    pub fn load_terms(path: &Path) -> Result<HashSet<String>, IndexError> {
        let content = fs::read_to_string(path).map_err(|source| IndexError::WordList {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_lowercase)
            .collect())
    }

    /// Returns the normalized hint if it activates the policy.
    fn active_hint(&self, hint: Option<&str>) -> Option<String> {
        let hint = hint?.trim().to_lowercase();
        self.hint_types.contains(&hint).then_some(hint)
    }

    /// Returns true if `word` survives narrowing.
    fn keeps(&self, word: &str) -> bool {
        self.significant_terms.is_empty() || self.significant_terms.contains(word)
    }
}

/// The expansions installed for a searcher.
#[derive(Default)]
pub struct QueryExpansion {
    /// Type hint narrowing.
    type_hints: TypeHintPolicy,
    /// Synonym source.
    thesaurus: Option<Box<dyn Thesaurus>>,
}

impl QueryExpansion {
    /// Creates an expansion from a type hint policy and an optional thesaurus.
    pub fn new(type_hints: TypeHintPolicy, thesaurus: Option<Box<dyn Thesaurus>>) -> Self {
        Self {
            type_hints,
            thesaurus,
        }
    }

    /// Builds the query terms for `query` under an optional type hint.
    ///
    /// Without an active hint this is `normalizer.analyze(query)`. With one, only significant
    /// words are kept, each followed by the normalized form of all its synonyms, and the
    /// stemmed hint is appended as a final term. The hint is never dropped as a stopword.
    pub fn query_terms(
        &self,
        normalizer: &Normalizer,
        query: &str,
        hint: Option<&str>,
    ) -> Vec<Term> {
        let Some(hint) = self.type_hints.active_hint(hint) else {
            return normalizer.analyze(query);
        };

        let mut terms = Vec::new();
        for word in normalizer.surface_words(query) {
            if !self.type_hints.keeps(&word) {
                continue;
            }
            terms.extend(normalizer.normalize(&word));
            if let Some(thesaurus) = &self.thesaurus {
                for synonym in thesaurus.synonyms(&word) {
                    terms.extend(normalizer.analyze(&synonym));
                }
            }
        }
        terms.push(normalizer.stem(&hint));
        terms
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{stemmer::IdentityStemmer, stopwords::Stopwords};

    const WORDNET: &str = "\
s(100001740,1,'entity',n,1,11).
s(114070360,1,'disease',n,1,42).
s(114070360,2,'illness',n,1,0).
s(114070360,3,'unwellness',n,1,0).
s(114070360,4,'heart disease',n,1,0).
s(105218119,1,'heart',n,1,0).
s(105218119,2,'ticker',n,1,0).
s(100000001,1,'o''brien',n,1,0).
";

    fn normalizer() -> Normalizer {
        let mut stopwords = Stopwords::empty();
        stopwords.extend(["the", "of"]);
        Normalizer::new(stopwords, Box::new(IdentityStemmer))
    }

    fn policy(significant: &[&str]) -> TypeHintPolicy {
        TypeHintPolicy::new(
            ["diagnosis", "test", "treatment"],
            significant.iter().map(|w| (*w).to_string()).collect(),
        )
    }

    #[test]
    fn wordnet_groups_synsets() {
        let thesaurus = WordNetThesaurus::parse(WORDNET).unwrap();
        assert_eq!(thesaurus.synonyms("disease"), vec!["illness", "unwellness"]);
        assert_eq!(thesaurus.synonyms("ticker"), vec!["heart"]);
        assert!(thesaurus.synonyms("entity").is_empty());
        assert!(thesaurus.synonyms("unknown").is_empty());
    }

    #[test]
    fn wordnet_unescapes_quotes() {
        assert_eq!(
            parse_fact("100000001,1,'o''brien',n,1,0)."),
            Some((100_000_001, "o'brien".to_string()))
        );
        assert_eq!(parse_fact("garbage"), None);
    }

    #[test]
    fn malformed_fact_is_an_error() {
        let err = WordNetThesaurus::parse("s(abc,1,'x',n,1,0).").unwrap_err();
        assert!(err.contains("line 1"));
    }

    #[test]
    fn no_hint_is_plain_analysis() {
        let expansion = QueryExpansion::new(policy(&["heart"]), None);
        let terms = expansion.query_terms(&normalizer(), "disease of the lung", None);
        assert_eq!(terms, vec!["disease", "lung"]);
    }

    #[test]
    fn unknown_hint_is_ignored() {
        let expansion = QueryExpansion::new(policy(&["heart"]), None);
        let terms = expansion.query_terms(&normalizer(), "lung disease", Some("prognosis"));
        assert_eq!(terms, vec!["lung", "disease"]);
    }

    #[test]
    fn hint_narrows_and_appends() {
        let expansion = QueryExpansion::new(policy(&["heart", "disease"]), None);
        let terms =
            expansion.query_terms(&normalizer(), "chronic heart disease", Some("Diagnosis"));
        assert_eq!(terms, vec!["heart", "disease", "diagnosis"]);
    }

    #[test]
    fn empty_significant_set_keeps_everything() {
        let expansion = QueryExpansion::new(policy(&[]), None);
        let terms = expansion.query_terms(&normalizer(), "chronic cough", Some("test"));
        assert_eq!(terms, vec!["chronic", "cough", "test"]);
    }

    #[test]
    fn hint_bypasses_stopwords() {
        let mut stopwords = Stopwords::empty();
        stopwords.extend(["test", "the"]);
        let normalizer = Normalizer::new(stopwords, Box::new(IdentityStemmer));
        let expansion = QueryExpansion::new(policy(&[]), None);
        let terms = expansion.query_terms(&normalizer, "the chronic cough", Some("test"));
        assert_eq!(terms, vec!["chronic", "cough", "test"]);
    }

    #[test]
    fn every_synonym_is_added() {
        let thesaurus = WordNetThesaurus::parse(WORDNET).unwrap();
        let expansion = QueryExpansion::new(policy(&["disease"]), Some(Box::new(thesaurus)));
        let terms = expansion.query_terms(&normalizer(), "disease", Some("treatment"));
        assert_eq!(terms, vec!["disease", "illness", "unwellness", "treatment"]);
    }
}
