//! Configuration file parsing.
//!
//! Parses individual `.lexis.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Index construction section.
    pub index: Option<RawIndexSettings>,
    /// Text analysis section.
    pub analysis: Option<RawAnalysisSettings>,
    /// Field weight overrides: field name -> multiplier.
    pub fields: Option<BTreeMap<String, f64>>,
    /// Search section.
    pub search: Option<RawSearchSettings>,
}

/// Raw index settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIndexSettings {
    /// Index directory, relative to the config file.
    pub directory: Option<String>,
    /// Distinct terms held in memory before a partial index is spilled.
    pub spill_threshold: Option<usize>,
    /// Default collection root for `lexis index`.
    pub collection: Option<String>,
}

/// Raw analysis settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAnalysisSettings {
    /// Stemming language, or `none`.
    pub stemmer: Option<String>,
    /// Stopword languages. Accepts either a single string or an array of strings.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub stopwords: Option<Vec<String>>,
    /// Extra newline-separated stopword files.
    pub stopword_files: Option<Vec<String>>,
}

/// Raw search settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Maximum hits printed per query.
    pub limit: Option<usize>,
    /// Per-query deadline in milliseconds (0 disables).
    pub deadline_ms: Option<u64>,
    /// Query type hints that enable significant-term filtering.
    pub hint_types: Option<Vec<String>>,
    /// Word file of domain-significant terms.
    pub significant_terms: Option<String>,
    /// WordNet `wn_s.pl` file used for synonym expansion.
    pub thesaurus: Option<String>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Returns true if the config file at `path` sets `root = true`.
///
/// Unreadable or malformed files are treated as non-root; the error surfaces later
/// when the file is parsed for real.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
