//! Merging partial indexes into the final index.
//!
//! Partial indexes are merged two at a time from a FIFO queue until one pair is left, which
//! is merged into the final vocabulary and postings files. Each step is a merge-join over
//! the two sorted vocabularies; postings files are read strictly forward because runs appear
//! in vocabulary order. Each posting is rewritten about `log2(partials)` times.
//!
//! Intermediate merges copy runs byte for byte. The final merge decodes every posting and
//! appends the byte offset of its document's record in the documents file.

use std::{
    cmp::Ordering,
    collections::{HashMap, VecDeque},
    path::PathBuf,
};

use byteorder::{BigEndian, WriteBytesExt};
use tracing::{debug, info};

use crate::{
    IndexError,
    codec::{CountingWriter, span, write_str},
    location::IndexFiles,
    partial::{
        PartialEntry, PartialIndex, PartialPostingsReader, PartialVocabReader, PartialWriter,
        write_empty,
    },
};

/// Counters from a complete merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Pairwise merges performed, including the final one.
    pub merges: usize,
    /// Terms in the final vocabulary.
    pub terms: u64,
}

/// Destination of a merge-join.
trait MergeSink {
    /// Starts a new term.
    fn begin_term(&mut self);

    /// Appends the next run from `postings`, described by `entry`.
    fn append_run(
        &mut self,
        postings: &mut PartialPostingsReader,
        entry: &PartialEntry,
    ) -> Result<(), IndexError>;

    /// Closes the term with its combined document frequency.
    fn end_term(&mut self, term: &str, df: u64) -> Result<(), IndexError>;
}

/// Writes another partial index, copying runs verbatim.
struct PartialSink {
    /// Output partial index.
    writer: PartialWriter,
    /// Start of the current run.
    run_start: u64,
}

impl MergeSink for PartialSink {
    fn begin_term(&mut self) {
        self.run_start = self.writer.run_start();
    }

    fn append_run(
        &mut self,
        postings: &mut PartialPostingsReader,
        entry: &PartialEntry,
    ) -> Result<(), IndexError> {
        postings.copy_run(entry.run_len, self.writer.postings())
    }

    fn end_term(&mut self, term: &str, df: u64) -> Result<(), IndexError> {
        self.writer.end_term(term, df, self.run_start)
    }
}

/// Writes the final vocabulary and postings files.
struct FinalSink<'a> {
    /// Final vocabulary output.
    vocabulary: CountingWriter,
    /// Final postings output.
    postings: CountingWriter,
    /// Final postings path, for error reporting.
    postings_path: PathBuf,
    /// Document id -> record offset in the documents file.
    document_offsets: &'a HashMap<String, u64>,
    /// Start of the current run.
    run_start: u64,
}

impl MergeSink for FinalSink<'_> {
    fn begin_term(&mut self) {
        self.run_start = self.postings.position();
    }

    fn append_run(
        &mut self,
        postings: &mut PartialPostingsReader,
        entry: &PartialEntry,
    ) -> Result<(), IndexError> {
        for posting in postings.read_run(entry.df, entry.run_len)? {
            let Some(&pointer) = self.document_offsets.get(&posting.document_id) else {
                return Err(IndexError::corrupt(
                    &self.postings_path,
                    self.postings.position(),
                    format!("posting for unknown document {}", posting.document_id),
                ));
            };
            write_str(&mut self.postings, &posting.document_id)?;
            self.postings.write_f64::<BigEndian>(posting.weight)?;
            self.postings.write_u64::<BigEndian>(pointer)?;
        }
        Ok(())
    }

    fn end_term(&mut self, term: &str, df: u64) -> Result<(), IndexError> {
        let run_len = span(self.run_start, self.postings.position());
        write_str(&mut self.vocabulary, term)?;
        self.vocabulary.write_u64::<BigEndian>(df)?;
        self.vocabulary.write_u64::<BigEndian>(self.run_start)?;
        self.vocabulary.write_u64::<BigEndian>(run_len)?;
        Ok(())
    }
}

/// Merge-joins two partial indexes into `sink`, returning the number of terms written.
fn merge_into<S: MergeSink>(
    left: &PartialIndex,
    right: &PartialIndex,
    sink: &mut S,
) -> Result<u64, IndexError> {
    let mut left_vocab = PartialVocabReader::open(&left.vocabulary)?;
    let mut left_postings = PartialPostingsReader::open(&left.postings)?;
    let mut right_vocab = PartialVocabReader::open(&right.vocabulary)?;
    let mut right_postings = PartialPostingsReader::open(&right.postings)?;

    let mut left_entry = left_vocab.next_entry()?;
    let mut right_entry = right_vocab.next_entry()?;
    let mut terms = 0;

    loop {
        let order = match (&left_entry, &right_entry) {
            (None, None) => break,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(l), Some(r)) => l.term.cmp(&r.term),
        };

        sink.begin_term();
        match order {
            Ordering::Less => {
                if let Some(entry) = left_entry.take() {
                    sink.append_run(&mut left_postings, &entry)?;
                    sink.end_term(&entry.term, entry.df)?;
                }
                left_entry = left_vocab.next_entry()?;
            }
            Ordering::Greater => {
                if let Some(entry) = right_entry.take() {
                    sink.append_run(&mut right_postings, &entry)?;
                    sink.end_term(&entry.term, entry.df)?;
                }
                right_entry = right_vocab.next_entry()?;
            }
            Ordering::Equal => {
                if let (Some(l), Some(r)) = (left_entry.take(), right_entry.take()) {
                    sink.append_run(&mut left_postings, &l)?;
                    sink.append_run(&mut right_postings, &r)?;
                    sink.end_term(&l.term, l.df + r.df)?;
                }
                left_entry = left_vocab.next_entry()?;
                right_entry = right_vocab.next_entry()?;
            }
        }
        terms += 1;
    }
    Ok(terms)
}

/// Drives the pairwise merge queue for one build.
pub(crate) struct Merger<'a> {
    /// Index directory layout.
    files: &'a IndexFiles,
    /// Sequence number for the next partial index created.
    next_sequence: usize,
}

impl<'a> Merger<'a> {
    /// Creates a merger whose new partial indexes start at `next_sequence`.
    pub(crate) fn new(files: &'a IndexFiles, next_sequence: usize) -> Self {
        Self {
            files,
            next_sequence,
        }
    }

    /// Reserves a new partial index slot.
    fn allocate(&mut self) -> PartialIndex {
        let partial = PartialIndex::at(self.files, self.next_sequence);
        self.next_sequence += 1;
        partial
    }

    /// Creates an empty partial index to pair with a lone one.
    fn empty_partial(&mut self) -> Result<PartialIndex, IndexError> {
        let partial = self.allocate();
        write_empty(&partial)?;
        Ok(partial)
    }

    /// Merges all partial indexes into the final vocabulary and postings files.
    ///
    /// Every input partial index is deleted. `document_offsets` must hold every document id
    /// that appears in a posting.
    pub(crate) fn merge_all(
        mut self,
        partials: Vec<PartialIndex>,
        document_offsets: &HashMap<String, u64>,
    ) -> Result<MergeStats, IndexError> {
        let mut queue = VecDeque::from(partials);
        let mut stats = MergeStats::default();

        loop {
            let left = match queue.pop_front() {
                Some(partial) => partial,
                None => self.empty_partial()?,
            };
            let right = match queue.pop_front() {
                Some(partial) => partial,
                None => self.empty_partial()?,
            };

            if queue.is_empty() {
                stats.terms = self.merge_final(&left, &right, document_offsets)?;
                stats.merges += 1;
                left.remove()?;
                right.remove()?;
                info!(terms = stats.terms, merges = stats.merges, "wrote final index");
                return Ok(stats);
            }

            let merged = self.allocate();
            let mut sink = PartialSink {
                writer: PartialWriter::create(&merged)?,
                run_start: 0,
            };
            let terms = merge_into(&left, &right, &mut sink)?;
            sink.writer.finish()?;
            left.remove()?;
            right.remove()?;
            stats.merges += 1;
            debug!(
                left = left.sequence,
                right = right.sequence,
                into = merged.sequence,
                terms,
                "merged partial indexes"
            );
            queue.push_back(merged);
        }
    }

    /// Merges the last pair into the final files.
    fn merge_final(
        &self,
        left: &PartialIndex,
        right: &PartialIndex,
        document_offsets: &HashMap<String, u64>,
    ) -> Result<u64, IndexError> {
        let mut sink = FinalSink {
            vocabulary: CountingWriter::create(&self.files.vocabulary)?,
            postings: CountingWriter::create(&self.files.postings)?,
            postings_path: self.files.postings.clone(),
            document_offsets,
            run_start: 0,
        };
        let terms = merge_into(left, right, &mut sink)?;
        sink.vocabulary.finish()?;
        sink.postings.finish()?;
        Ok(terms)
    }
}

#[cfg(test)]
mod test {
    use std::{fs, path::Path};

    use super::*;
    use crate::vocabulary::read_vocabulary;

    /// Writes a partial index from `(term, [(doc, weight)])` lists.
    fn partial(
        files: &IndexFiles,
        sequence: usize,
        terms: &[(&str, &[(&str, f64)])],
    ) -> PartialIndex {
        let partial = PartialIndex::at(files, sequence);
        let mut writer = PartialWriter::create(&partial).unwrap();
        for (term, postings) in terms {
            let start = writer.run_start();
            for (doc, weight) in *postings {
                writer.write_posting(doc, *weight).unwrap();
            }
            writer.end_term(term, postings.len() as u64, start).unwrap();
        }
        writer.finish().unwrap();
        partial
    }

    fn offsets(ids: &[&str]) -> HashMap<String, u64> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| ((*id).to_string(), 8 + i as u64 * 100))
            .collect()
    }

    fn part_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".part"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn equal_terms_sum_df_and_concatenate_runs() {
        let dir = tempfile::tempdir().unwrap();
        let files = IndexFiles::new(dir.path());
        let a = partial(
            &files,
            0,
            &[("disease", &[("d1", 1.0)]), ("heart", &[("d1", 1.0)])],
        );
        let b = partial(
            &files,
            1,
            &[("disease", &[("d2", 0.5)]), ("lung", &[("d2", 1.0)])],
        );

        let stats = Merger::new(&files, 2)
            .merge_all(vec![a, b], &offsets(&["d1", "d2"]))
            .unwrap();
        assert_eq!(stats, MergeStats { merges: 1, terms: 3 });

        let vocab = read_vocabulary(&files.vocabulary).unwrap();
        let terms: Vec<_> = vocab
            .iter()
            .map(|(t, e)| (t.as_str(), e.document_frequency))
            .collect();
        assert_eq!(terms, vec![("disease", 2), ("heart", 1), ("lung", 1)]);
        assert!(part_files(dir.path()).is_empty());
    }

    #[test]
    fn many_partials_drain_through_the_queue() {
        let dir = tempfile::tempdir().unwrap();
        let files = IndexFiles::new(dir.path());
        let partials: Vec<_> = (0..5)
            .map(|i| {
                let doc = format!("d{i}");
                partial(&files, i, &[("shared", &[(doc.as_str(), 1.0)])])
            })
            .collect();

        let stats = Merger::new(&files, 5)
            .merge_all(partials, &offsets(&["d0", "d1", "d2", "d3", "d4"]))
            .unwrap();
        assert_eq!(stats.merges, 4);

        let vocab = read_vocabulary(&files.vocabulary).unwrap();
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab[0].1.document_frequency, 5);
        assert!(part_files(dir.path()).is_empty());
    }

    #[test]
    fn single_partial_merges_with_empty_dummy() {
        let dir = tempfile::tempdir().unwrap();
        let files = IndexFiles::new(dir.path());
        let only = partial(&files, 0, &[("heart", &[("d1", 1.0)])]);

        let stats = Merger::new(&files, 1)
            .merge_all(vec![only], &offsets(&["d1"]))
            .unwrap();
        assert_eq!(stats, MergeStats { merges: 1, terms: 1 });
        assert!(part_files(dir.path()).is_empty());
    }

    #[test]
    fn no_partials_yields_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let files = IndexFiles::new(dir.path());
        let stats = Merger::new(&files, 0)
            .merge_all(Vec::new(), &HashMap::new())
            .unwrap();
        assert_eq!(stats.terms, 0);
        assert!(read_vocabulary(&files.vocabulary).unwrap().is_empty());
    }

    #[test]
    fn unknown_document_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let files = IndexFiles::new(dir.path());
        let only = partial(&files, 0, &[("heart", &[("ghost", 1.0)])]);

        let err = Merger::new(&files, 1)
            .merge_all(vec![only], &offsets(&["d1"]))
            .unwrap_err();
        assert!(matches!(err, IndexError::Corrupt { .. }));
    }
}
