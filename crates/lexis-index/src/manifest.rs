//! Completion manifest.
//!
//! `manifest.json` is the last file a build writes. Its presence means the vocabulary,
//! postings and documents files are complete and consistent; it also records how the index
//! was built so that `lexis status` can describe it.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::IndexError;

/// Version of the on-disk layout.
pub const FORMAT_VERSION: u32 = 1;

/// Metadata describing a completed index build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// On-disk layout version.
    pub format_version: u32,
    /// Collection root the index was built from.
    pub collection: PathBuf,
    /// Number of documents indexed.
    pub documents: u64,
    /// Number of distinct terms in the vocabulary.
    pub terms: u64,
    /// Partial indexes spilled during accumulation.
    pub partial_indexes: usize,
    /// Pairwise merges performed.
    pub merges: usize,
    /// Build completion time, seconds since the Unix epoch.
    pub built_at: u64,
    /// Stemmer name.
    pub stemmer: String,
    /// Stopword languages.
    pub stopwords: Vec<String>,
}

impl Manifest {
    /// Current time as seconds since the Unix epoch.
    pub(crate) fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Loads a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            IndexError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to parse manifest: {e}"),
            ))
        })
    }

    /// Saves the manifest to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            IndexError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to serialize manifest: {e}"),
            ))
        })?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let manifest = Manifest {
            format_version: FORMAT_VERSION,
            collection: PathBuf::from("/corpus"),
            documents: 2,
            terms: 5,
            partial_indexes: 1,
            merges: 1,
            built_at: 1_700_000_000,
            stemmer: "english".to_string(),
            stopwords: vec!["english".to_string()],
        };
        manifest.save(&path).unwrap();
        assert_eq!(Manifest::load(&path).unwrap(), manifest);
    }

    #[test]
    fn invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, "not json").unwrap();
        assert!(Manifest::load(&path).is_err());
    }
}
