//! Configuration system for lexis.
//!
//! lexis uses TOML configuration files named `.lexis.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.lexis.toml` files found, then loading `~/.lexis.toml` as the global config with lowest
//! precedence.
//!
//! The resolved [`Config`] is an explicit value: it is built once per process and passed by
//! reference into the indexer and searcher.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawAnalysisSettings, RawConfig, RawIndexSettings, RawSearchSettings, parse_config_file,
    parse_config_str,
};
pub use resolve::resolve_path;
use serde::Serialize;
pub use templates::config_template;

/// Directory name for lexis data (sibling to `.lexis.toml`).
const DATA_DIR: &str = ".lexis";
/// Subdirectory within the data directory holding the index files.
const INDEX_DIR: &str = "index";

/// Top-level merged configuration for lexis.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.lexis.toml` files according to precedence rules. All paths are absolute.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Config {
    /// Index construction settings.
    pub index: IndexSettings,
    /// Text analysis settings shared by indexing and search.
    pub analysis: AnalysisSettings,
    /// Field weight overrides: field name -> multiplier.
    pub fields: BTreeMap<String, f64>,
    /// Search settings.
    pub search: SearchSettings,
    /// Directory containing the most specific config file.
    #[serde(skip)]
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.lexis.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Returns the directory holding the index files.
    ///
    /// An explicit `[index] directory` wins; otherwise the index lives in `.lexis/index`
    /// next to the most specific config file, or under `cwd` when there is none.
    pub fn index_directory(&self, cwd: &Path) -> PathBuf {
        if let Some(dir) = &self.index.directory {
            return dir.clone();
        }
        self.config_root
            .as_deref()
            .unwrap_or(cwd)
            .join(DATA_DIR)
            .join(INDEX_DIR)
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Index construction settings.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSettings {
    /// Explicit index directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    /// Distinct terms held in memory before a partial index is spilled.
    pub spill_threshold: usize,
    /// Default collection root for `lexis index`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<PathBuf>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            directory: None,
            spill_threshold: 1_000_000,
            collection: None,
        }
    }
}

/// Text analysis settings.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSettings {
    /// Stemming language, or `none` for identity stemming.
    pub stemmer: String,
    /// Stopword list languages.
    pub stopwords: Vec<String>,
    /// Extra newline-separated stopword files.
    pub stopword_files: Vec<PathBuf>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            stemmer: String::from("english"),
            stopwords: vec![String::from("english"), String::from("greek")],
            stopword_files: Vec::new(),
        }
    }
}

/// Search settings.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSettings {
    /// Maximum hits printed per query.
    pub limit: usize,
    /// Per-query deadline in milliseconds; 0 disables the deadline.
    pub deadline_ms: u64,
    /// Query type hints that enable significant-term filtering.
    pub hint_types: Vec<String>,
    /// Word file of domain-significant terms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significant_terms: Option<PathBuf>,
    /// WordNet `wn_s.pl` file used for synonym expansion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thesaurus: Option<PathBuf>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            limit: 10,
            deadline_ms: 5_000,
            hint_types: vec![
                String::from("diagnosis"),
                String::from("test"),
                String::from("treatment"),
            ],
            significant_terms: None,
            thesaurus: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_index_directory_uses_cwd() {
        let config = Config::default();
        assert_eq!(
            config.index_directory(Path::new("/work")),
            PathBuf::from("/work/.lexis/index")
        );
    }

    #[test]
    fn index_directory_follows_config_root() {
        let config = Config {
            config_root: Some(PathBuf::from("/project")),
            ..Default::default()
        };
        assert_eq!(
            config.index_directory(Path::new("/project/sub")),
            PathBuf::from("/project/.lexis/index")
        );
    }

    #[test]
    fn settings_serialize_to_toml() {
        let toml = Config::default().settings_to_toml().unwrap();
        assert!(toml.contains("spill_threshold = 1000000"));
        assert!(toml.contains("stemmer = \"english\""));
    }
}
