//! Collection discovery.
//!
//! Walks a collection root and yields the paths of supported document files in a stable
//! order. The walk is lazy: nothing is read until the iterator is advanced, and calling
//! [`discover_documents`] again restarts it from the beginning.

use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use lexis_document::Format;
use walkdir::{DirEntry, WalkDir};

use crate::IndexError;

/// A regular file found while walking a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionFile {
    /// A file the document reader handles.
    Document(PathBuf),
    /// A file with an extension the document reader does not handle.
    Unsupported(PathBuf),
}

/// Lazily lists every regular file under `root`, sorted by path.
///
/// Hidden files and directories are skipped, except the root itself. When `root` is a
/// file, it is the whole collection.
pub fn walk_collection(root: &Path) -> impl Iterator<Item = Result<CollectionFile, IndexError>> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(classify(entry))),
            Ok(_) => None,
            Err(e) => Some(Err(IndexError::Io(io::Error::from(e)))),
        })
}

/// Lazily lists supported document files under `root`, sorted by path.
pub fn discover_documents(root: &Path) -> impl Iterator<Item = Result<PathBuf, IndexError>> {
    walk_collection(root).filter_map(|file| match file {
        Ok(CollectionFile::Document(path)) => Some(Ok(path)),
        Ok(CollectionFile::Unsupported(_)) => None,
        Err(e) => Some(Err(e)),
    })
}

/// Checks if a filename represents a hidden file (starts with '.').
fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// Sorts a regular file by whether the document reader handles it.
fn classify(entry: DirEntry) -> CollectionFile {
    if Format::from_path(entry.path()).is_some() {
        CollectionFile::Document(entry.into_path())
    } else {
        CollectionFile::Unsupported(entry.into_path())
    }
}
