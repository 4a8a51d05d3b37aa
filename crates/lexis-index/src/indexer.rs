//! Full indexing pipeline.
//!
//! The [`Indexer`] rebuilds an index from scratch:
//! 1. Remove the previous index files
//! 2. Walk the collection and read each document
//! 3. Accumulate weighted terms, spilling a partial index whenever the in-memory vocabulary
//!    reaches the spill threshold
//! 4. Write the documents file, merge the partial indexes and backfill vector norms
//! 5. Write the manifest, marking the index complete

use std::{fs, io, path::Path};

use lexis_document::{CollectionReader, DocumentReader};
use tracing::{debug, info, warn};

use crate::{
    IndexError,
    accumulator::Accumulator,
    context::IndexContext,
    discovery::{CollectionFile, walk_collection},
    documents::write_documents,
    location::IndexFiles,
    manifest::{FORMAT_VERSION, Manifest},
    merge::{MergeStats, Merger},
    norms::backfill_norms,
    partial::{PartialIndex, write_partial},
};

/// Extension of partial index files.
const PARTIAL_EXTENSION: &str = "part";

/// Statistics from an indexing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Documents indexed.
    pub documents: usize,
    /// Distinct terms in the final vocabulary.
    pub terms: u64,
    /// Partial indexes spilled during accumulation.
    pub partial_indexes: usize,
    /// Pairwise merges performed.
    pub merges: usize,
    /// Files skipped because the document reader does not handle their extension.
    pub skipped: usize,
}

/// Callback for reporting indexing progress.
pub trait ProgressReporter {
    /// Called after a document has been accumulated.
    fn on_document(&mut self, path: &Path, terms: usize);

    /// Called after a partial index has been written.
    fn on_spill(&mut self, sequence: usize, terms: usize);

    /// Called when the final vocabulary and postings are written.
    fn on_merge_complete(&mut self, stats: &MergeStats);

    /// Called when indexing is complete.
    fn on_complete(&mut self, stats: &IndexStats);
}

/// A no-op progress reporter for silent indexing.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn on_document(&mut self, _path: &Path, _terms: usize) {}
    fn on_spill(&mut self, _sequence: usize, _terms: usize) {}
    fn on_merge_complete(&mut self, _stats: &MergeStats) {}
    fn on_complete(&mut self, _stats: &IndexStats) {}
}

/// Builds an index in one directory.
pub struct Indexer<'a> {
    /// Analysis settings shared with the searcher.
    context: &'a IndexContext,
    /// Index file layout.
    files: IndexFiles,
}

impl<'a> Indexer<'a> {
    /// Creates an indexer writing to `index_dir`.
    pub fn new(context: &'a IndexContext, index_dir: &Path) -> Self {
        Self {
            context,
            files: IndexFiles::new(index_dir),
        }
    }

    /// The files this indexer writes.
    pub fn files(&self) -> &IndexFiles {
        &self.files
    }

    /// Rebuilds the index from the collection at `root`.
    ///
    /// Any existing index in the directory is removed first. A document that cannot be read,
    /// or that repeats another document's id, aborts the build and leaves the index
    /// incomplete.
    pub fn index<R: ProgressReporter + ?Sized>(
        &self,
        root: &Path,
        reporter: &mut R,
    ) -> Result<IndexStats, IndexError> {
        fs::create_dir_all(&self.files.dir)?;
        self.remove_existing()?;
        info!(root = %root.display(), dir = %self.files.dir.display(), "indexing collection");

        let reader = CollectionReader;
        let mut accumulator = Accumulator::new(self.context.normalizer(), self.context.weights());
        let mut partials = Vec::new();

        let mut skipped = 0;

        for file in walk_collection(root) {
            let path = match file? {
                CollectionFile::Document(path) => path,
                CollectionFile::Unsupported(path) => {
                    warn!(path = %path.display(), "skipping file with unsupported extension");
                    skipped += 1;
                    continue;
                }
            };
            let document = reader.read(&path)?;
            let terms =
                accumulator.add_document(&document.id, &document.path, &document.fields)?;
            reporter.on_document(&document.path, terms);
            if accumulator.should_spill(self.context.spill_threshold()) {
                self.spill(&mut accumulator, &mut partials, reporter)?;
            }
        }
        if accumulator.distinct_terms() > 0 {
            self.spill(&mut accumulator, &mut partials, reporter)?;
        }

        let documents = accumulator.documents().len();
        if documents == 0 {
            warn!(root = %root.display(), "collection has no documents");
        }
        let offsets = write_documents(&self.files.documents, accumulator.documents())?;
        let partial_indexes = partials.len();
        let merge = Merger::new(&self.files, partial_indexes).merge_all(partials, &offsets)?;
        reporter.on_merge_complete(&merge);
        backfill_norms(&self.files)?;

        let stats = IndexStats {
            documents,
            terms: merge.terms,
            partial_indexes,
            merges: merge.merges,
            skipped,
        };
        Manifest {
            format_version: FORMAT_VERSION,
            collection: root.to_path_buf(),
            documents: documents as u64,
            terms: stats.terms,
            partial_indexes,
            merges: stats.merges,
            built_at: Manifest::now(),
            stemmer: self.context.stemmer_name().to_string(),
            stopwords: self.context.stopword_languages().to_vec(),
        }
        .save(&self.files.manifest)?;

        info!(
            documents,
            terms = stats.terms,
            partial_indexes,
            merges = stats.merges,
            "index complete"
        );
        reporter.on_complete(&stats);
        Ok(stats)
    }

    /// Writes the accumulated terms to the next partial index and clears them.
    fn spill<R: ProgressReporter + ?Sized>(
        &self,
        accumulator: &mut Accumulator<'_>,
        partials: &mut Vec<PartialIndex>,
        reporter: &mut R,
    ) -> Result<(), IndexError> {
        let partial = PartialIndex::at(&self.files, partials.len());
        let terms = write_partial(accumulator, &partial)?;
        accumulator.clear_terms();
        reporter.on_spill(partial.sequence, terms);
        partials.push(partial);
        Ok(())
    }

    /// Deletes the final files, the manifest and partial indexes left by an aborted build.
    ///
    /// The manifest goes first so an interrupted delete never looks complete.
    fn remove_existing(&self) -> Result<(), IndexError> {
        remove_if_exists(&self.files.manifest)?;
        for path in self.files.data_files() {
            remove_if_exists(path)?;
        }
        for entry in fs::read_dir(&self.files.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == PARTIAL_EXTENSION) {
                debug!(path = %path.display(), "removing stale partial index");
                remove_if_exists(&path)?;
            }
        }
        Ok(())
    }
}

/// Removes a file, ignoring one that does not exist.
fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
