//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules and resolving paths.

use std::path::{Path, PathBuf};

use crate::{
    AnalysisSettings, Config, ConfigError, IndexSettings, SearchSettings,
    parse::{RawAnalysisSettings, RawConfig, RawIndexSettings, RawSearchSettings},
    resolve::resolve_path,
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory containing the config file, used to resolve relative paths.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings and lists: first defined value wins (highest precedence)
/// - Field weights: merged per field name, first definition wins
/// - Paths are resolved relative to the file that defined them
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let mut config = Config {
        config_root: configs.first().map(|c| c.dir().to_path_buf()),
        ..Default::default()
    };

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        let dir = parsed.dir();
        if let Some(ref index) = parsed.config.index {
            apply_raw_index(&mut config.index, index, parsed)?;
        }
        if let Some(ref analysis) = parsed.config.analysis {
            apply_raw_analysis(&mut config.analysis, analysis, dir)?;
        }
        if let Some(ref fields) = parsed.config.fields {
            for (name, weight) in fields {
                if !weight.is_finite() || *weight <= 0.0 {
                    return Err(ConfigError::InvalidValue {
                        path: parsed.path.clone(),
                        key: format!("fields.{name}"),
                        message: "weight must be a positive number".to_string(),
                    });
                }
                config.fields.insert(name.clone(), *weight);
            }
        }
        if let Some(ref search) = parsed.config.search {
            apply_raw_search(&mut config.search, search, dir)?;
        }
    }

    Ok(config)
}

/// Applies raw index settings to result, overwriting any present values.
fn apply_raw_index(
    result: &mut IndexSettings,
    raw: &RawIndexSettings,
    parsed: &ParsedConfig,
) -> Result<(), ConfigError> {
    if let Some(ref v) = raw.directory {
        result.directory = Some(resolve_path(v, parsed.dir())?);
    }
    if let Some(v) = raw.spill_threshold {
        if v == 0 {
            return Err(ConfigError::InvalidValue {
                path: parsed.path.clone(),
                key: "index.spill_threshold".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        result.spill_threshold = v;
    }
    if let Some(ref v) = raw.collection {
        result.collection = Some(resolve_path(v, parsed.dir())?);
    }
    Ok(())
}

/// Applies raw analysis settings to result.
fn apply_raw_analysis(
    result: &mut AnalysisSettings,
    raw: &RawAnalysisSettings,
    dir: &Path,
) -> Result<(), ConfigError> {
    if let Some(ref v) = raw.stemmer {
        result.stemmer = v.clone();
    }
    if let Some(ref v) = raw.stopwords {
        result.stopwords = v.clone();
    }
    if let Some(ref files) = raw.stopword_files {
        result.stopword_files = files
            .iter()
            .map(|f| resolve_path(f, dir))
            .collect::<Result<_, _>>()?;
    }
    Ok(())
}

/// Applies raw search settings to result.
fn apply_raw_search(
    result: &mut SearchSettings,
    raw: &RawSearchSettings,
    dir: &Path,
) -> Result<(), ConfigError> {
    if let Some(v) = raw.limit {
        result.limit = v;
    }
    if let Some(v) = raw.deadline_ms {
        result.deadline_ms = v;
    }
    if let Some(ref v) = raw.hint_types {
        result.hint_types = v.clone();
    }
    if let Some(ref v) = raw.significant_terms {
        result.significant_terms = Some(resolve_path(v, dir)?);
    }
    if let Some(ref v) = raw.thesaurus {
        result.thesaurus = Some(resolve_path(v, dir)?);
    }
    Ok(())
}
