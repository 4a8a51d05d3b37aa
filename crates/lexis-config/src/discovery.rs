//! Configuration file discovery.
//!
//! Discovers `.lexis.toml` files by walking up the directory tree from a starting point,
//! then appending the global `~/.lexis.toml` if present.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".lexis.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global (`~/.lexis.toml`) last.
/// Walking stops early at a file that sets `root = true`, in which case the global file is
/// not consulted either.
///
/// Returns an empty vector if no configuration files are found.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    let mut found_root = false;

    let mut current = Some(cwd);
    while let Some(dir) = current {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.is_file() {
            let is_root = is_root_config(&config_path);
            configs.push(config_path);
            if is_root {
                found_root = true;
                break;
            }
        }
        current = dir.parent();
    }

    if !found_root
        && let Some(global_path) = global_config_path()
        && global_path.is_file()
        && !configs.contains(&global_path)
    {
        configs.push(global_path);
    }

    configs
}

/// Returns the path to the global configuration file (`~/.lexis.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDir;

    #[test]
    fn finds_nothing_in_empty_tree() {
        let dir = TestDir::new();
        let nested = dir.create_dir("a/b");
        let found: Vec<_> = discover_config_files(&nested)
            .into_iter()
            .filter(|p| p.starts_with(dir.path()))
            .collect();
        assert!(found.is_empty());
    }

    #[test]
    fn closest_config_comes_first() {
        let dir = TestDir::new();
        let outer = dir.create_config_at_root();
        let inner = dir.create_config("a/b");

        let found: Vec<_> = discover_config_files(&dir.path().join("a/b"))
            .into_iter()
            .filter(|p| p.starts_with(dir.path()))
            .collect();
        assert_eq!(found, vec![inner, outer]);
    }

    #[test]
    fn root_config_stops_walk() {
        let dir = TestDir::new();
        dir.create_config_at_root();
        let root = dir.create_root_config("project");
        dir.create_dir("project/src");

        let found = discover_config_files(&dir.path().join("project/src"));
        assert_eq!(found, vec![root]);
    }
}
