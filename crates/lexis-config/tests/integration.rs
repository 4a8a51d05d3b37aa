//! Integration tests for lexis-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> resolve -> merge.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use lexis_config::{CONFIG_FILENAME, Config, ConfigError, discover_config_files};

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    /// Owned temporary directory.
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a file with content and returns its path.
    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn load_from_no_files_returns_default() {
    let config = Config::load_from_files(&[]).unwrap();

    assert!(config.config_root.is_none());
    assert_eq!(config.analysis.stemmer, "english");
    assert_eq!(config.analysis.stopwords, vec!["english", "greek"]);
    assert_eq!(config.search.limit, 10);
}

#[test]
fn nested_configs_merge_with_closest_first() {
    let env = TestEnv::new();
    env.create_file(
        CONFIG_FILENAME,
        "root = true\n[index]\nspill_threshold = 50\ncollection = \"corpus\"\n[search]\nlimit = 3\n",
    );
    env.create_file(
        &format!("project/{CONFIG_FILENAME}"),
        "[search]\nlimit = 7\n[analysis]\nstemmer = \"none\"\n",
    );
    let cwd = env.path().join("project");

    let files = discover_config_files(&cwd);
    assert_eq!(files.len(), 2);

    let config = Config::load(&cwd).unwrap();
    assert_eq!(config.search.limit, 7);
    assert_eq!(config.index.spill_threshold, 50);
    assert_eq!(config.analysis.stemmer, "none");
    assert_eq!(config.index.collection, Some(env.path().join("corpus")));
    assert_eq!(
        config.index_directory(&cwd),
        cwd.join(".lexis").join("index")
    );
}

#[test]
fn malformed_config_is_an_error() {
    let env = TestEnv::new();
    let path = env.create_file(CONFIG_FILENAME, "root = true\n[index\n");

    let err = Config::load(env.path()).unwrap_err();
    match err {
        ConfigError::ParseToml { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_keys_are_ignored() {
    let env = TestEnv::new();
    env.create_file(CONFIG_FILENAME, "root = true\n[index]\nflavour = \"mint\"\n");

    let config = Config::load(env.path()).unwrap();
    assert_eq!(config.index.spill_threshold, 1_000_000);
}
