//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use lexis_config::Config;
use lexis_index::{IndexContext, SearchParams, Searcher};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Directory holding the index files.
    pub fn index_dir(&self) -> PathBuf {
        self.config.index_directory(&self.cwd)
    }

    /// Builds the analysis context, loading stopwords, stemmer and expansion resources.
    pub fn index_context(&self) -> Result<IndexContext, ExitCode> {
        IndexContext::from_config(&self.config).map_err(|e| {
            eprintln!("error: failed to load analysis resources: {e}");
            ExitCode::FAILURE
        })
    }

    /// Search parameters from configuration with an optional limit override.
    pub fn search_params(&self, context: &IndexContext, limit: Option<usize>) -> SearchParams {
        let defaults = context.search_defaults().clone();
        match limit {
            Some(limit) => defaults.with_limit(Some(limit)),
            None => defaults,
        }
    }
}

/// Opens the searcher, exiting with a consistent error on failure.
pub fn open_searcher_or_failure<'c>(
    context: &'c IndexContext,
    dir: &Path,
) -> Result<Searcher<'c>, ExitCode> {
    Searcher::open(context, dir).map_err(|e| {
        eprintln!("error: failed to open index: {e}");
        eprintln!("Run 'lexis index' to build it.");
        ExitCode::FAILURE
    })
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
