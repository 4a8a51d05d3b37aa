//! File layout of an index directory.
//!
//! A complete index is three binary files plus `manifest.json`, which is written last.
//! Partial indexes live next to them while a build runs.

use std::path::{Path, PathBuf};

/// Final vocabulary file name.
const VOCABULARY_FILE: &str = "vocabulary.bin";
/// Final postings file name.
const POSTINGS_FILE: &str = "postings.bin";
/// Documents file name.
const DOCUMENTS_FILE: &str = "documents.bin";
/// Completion manifest file name.
const MANIFEST_FILE: &str = "manifest.json";

/// Paths of the final index files in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexFiles {
    /// Index directory.
    pub dir: PathBuf,
    /// Sorted vocabulary with postings offsets.
    pub vocabulary: PathBuf,
    /// Postings runs with document pointers.
    pub postings: PathBuf,
    /// Document records with vector norms.
    pub documents: PathBuf,
    /// Completion manifest.
    pub manifest: PathBuf,
}

impl IndexFiles {
    /// Lays out the index files under `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            vocabulary: dir.join(VOCABULARY_FILE),
            postings: dir.join(POSTINGS_FILE),
            documents: dir.join(DOCUMENTS_FILE),
            manifest: dir.join(MANIFEST_FILE),
        }
    }

    /// The three binary data files.
    pub fn data_files(&self) -> [&Path; 3] {
        [&self.vocabulary, &self.postings, &self.documents]
    }

    /// Partial vocabulary and postings paths for a sequence number.
    pub(crate) fn partial_paths(&self, sequence: usize) -> (PathBuf, PathBuf) {
        (
            self.dir.join(format!("vocabulary.{sequence}.part")),
            self.dir.join(format!("postings.{sequence}.part")),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layout() {
        let files = IndexFiles::new(Path::new("/idx"));
        assert_eq!(files.manifest, PathBuf::from("/idx/manifest.json"));
        assert_eq!(files.data_files()[1], Path::new("/idx/postings.bin"));

        let (vocab, postings) = files.partial_paths(3);
        assert_eq!(vocab, PathBuf::from("/idx/vocabulary.3.part"));
        assert_eq!(postings, PathBuf::from("/idx/postings.3.part"));
    }
}
