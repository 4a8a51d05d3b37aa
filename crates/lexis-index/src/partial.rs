//! Partial indexes: the on-disk spill format.
//!
//! A partial index is a vocabulary file of `(term, df, run_len)` records in term order and a
//! postings file holding one run of `(document_id, weight)` records per term, in the same
//! order. Weights are normalized term frequencies; idf is applied only at search time.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tracing::info;

use crate::{
    IndexError,
    accumulator::Accumulator,
    codec::{CountingReader, CountingWriter, read_str, span, write_str},
    location::IndexFiles,
};

/// One posting as stored in a partial index.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    /// Identifier of the document.
    pub document_id: String,
    /// Field-weighted tf divided by the document's max weighted tf.
    pub weight: f64,
}

/// A partial vocabulary record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PartialEntry {
    /// The term.
    pub(crate) term: String,
    /// Number of postings in the run.
    pub(crate) df: u64,
    /// Byte length of the run.
    pub(crate) run_len: u64,
}

/// A vocabulary/postings file pair produced during one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialIndex {
    /// Monotonic sequence number within the build.
    pub sequence: usize,
    /// Vocabulary file.
    pub vocabulary: PathBuf,
    /// Postings file.
    pub postings: PathBuf,
}

impl PartialIndex {
    /// The partial index with the given sequence number in an index directory.
    pub(crate) fn at(files: &IndexFiles, sequence: usize) -> Self {
        let (vocabulary, postings) = files.partial_paths(sequence);
        Self {
            sequence,
            vocabulary,
            postings,
        }
    }

    /// Deletes both files; already-missing files are fine.
    pub(crate) fn remove(&self) -> io::Result<()> {
        for path in [&self.vocabulary, &self.postings] {
            match fs::remove_file(path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
                _ => {}
            }
        }
        Ok(())
    }
}

/// Streams terms and their runs into a new partial index.
pub(crate) struct PartialWriter {
    /// Vocabulary output.
    vocabulary: CountingWriter,
    /// Postings output.
    postings: CountingWriter,
}

impl PartialWriter {
    /// Creates the files of `target`, truncating any leftovers.
    pub(crate) fn create(target: &PartialIndex) -> Result<Self, IndexError> {
        Ok(Self {
            vocabulary: CountingWriter::create(&target.vocabulary)?,
            postings: CountingWriter::create(&target.postings)?,
        })
    }

    /// Offset where the next run starts.
    pub(crate) fn run_start(&self) -> u64 {
        self.postings.position()
    }

    /// Appends one posting to the current run.
    pub(crate) fn write_posting(
        &mut self,
        document_id: &str,
        weight: f64,
    ) -> Result<(), IndexError> {
        write_str(&mut self.postings, document_id)?;
        self.postings.write_f64::<BigEndian>(weight)?;
        Ok(())
    }

    /// Raw postings output, for copying runs verbatim.
    pub(crate) fn postings(&mut self) -> &mut CountingWriter {
        &mut self.postings
    }

    /// Closes the current run and writes its vocabulary record.
    pub(crate) fn end_term(
        &mut self,
        term: &str,
        df: u64,
        run_start: u64,
    ) -> Result<(), IndexError> {
        let run_len = span(run_start, self.postings.position());
        write_str(&mut self.vocabulary, term)?;
        self.vocabulary.write_u64::<BigEndian>(df)?;
        self.vocabulary.write_u64::<BigEndian>(run_len)?;
        Ok(())
    }

    /// Flushes both files.
    pub(crate) fn finish(self) -> Result<(), IndexError> {
        self.vocabulary.finish()?;
        self.postings.finish()?;
        Ok(())
    }
}

/// Spills the accumulator's terms into a partial index.
///
/// Returns the number of terms written.
pub(crate) fn write_partial(
    acc: &Accumulator<'_>,
    target: &PartialIndex,
) -> Result<usize, IndexError> {
    let mut writer = PartialWriter::create(target)?;
    let mut count = 0;
    for (term, postings) in acc.terms() {
        let start = writer.run_start();
        for posting in postings {
            let max = acc
                .document(&posting.document_id)
                .map_or(0.0, |meta| meta.max_weighted_tf);
            let weight = if max > 0.0 {
                posting.weighted_tf() / max
            } else {
                0.0
            };
            writer.write_posting(&posting.document_id, weight)?;
        }
        writer.end_term(term, postings.len() as u64, start)?;
        count += 1;
    }
    writer.finish()?;
    info!(sequence = target.sequence, terms = count, "wrote partial index");
    Ok(count)
}

/// Creates an empty partial index, used as the other side of a lone merge.
pub(crate) fn write_empty(target: &PartialIndex) -> Result<(), IndexError> {
    PartialWriter::create(target)?.finish()
}

/// Sequential reader over a partial vocabulary file.
pub(crate) struct PartialVocabReader {
    /// Underlying file.
    reader: CountingReader,
}

impl PartialVocabReader {
    /// Opens a partial vocabulary file.
    pub(crate) fn open(path: &Path) -> Result<Self, IndexError> {
        Ok(Self {
            reader: CountingReader::open(path)?,
        })
    }

    /// Reads the next record, or `None` at end of file.
    pub(crate) fn next_entry(&mut self) -> Result<Option<PartialEntry>, IndexError> {
        if self.reader.at_eof()? {
            return Ok(None);
        }
        match decode_entry(&mut self.reader) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => Err(self.reader.decode_error(e)),
        }
    }
}

/// Sequential reader over a partial postings file.
pub(crate) struct PartialPostingsReader {
    /// Underlying file.
    reader: CountingReader,
}

impl PartialPostingsReader {
    /// Opens a partial postings file.
    pub(crate) fn open(path: &Path) -> Result<Self, IndexError> {
        Ok(Self {
            reader: CountingReader::open(path)?,
        })
    }

    /// Copies the next run byte for byte.
    pub(crate) fn copy_run<W: io::Write>(
        &mut self,
        run_len: u64,
        out: &mut W,
    ) -> Result<(), IndexError> {
        self.reader.copy_exact(run_len, out)
    }

    /// Decodes the next run of `df` postings spanning exactly `run_len` bytes.
    pub(crate) fn read_run(&mut self, df: u64, run_len: u64) -> Result<Vec<Posting>, IndexError> {
        let start = self.reader.position();
        let mut postings = Vec::new();
        while span(start, self.reader.position()) < run_len {
            match decode_posting(&mut self.reader) {
                Ok(posting) => postings.push(posting),
                Err(e) => return Err(self.reader.decode_error(e)),
            }
        }
        let consumed = span(start, self.reader.position());
        if consumed != run_len {
            return Err(self.reader.corrupt(format!(
                "posting run overran its declared length: read {consumed} of {run_len} bytes"
            )));
        }
        if postings.len() as u64 != df {
            return Err(self.reader.corrupt(format!(
                "posting run holds {} postings, vocabulary declares {df}",
                postings.len()
            )));
        }
        Ok(postings)
    }
}

/// Decodes one partial vocabulary record.
fn decode_entry<R: io::Read>(r: &mut R) -> io::Result<PartialEntry> {
    let term = read_str(r)?;
    let df = r.read_u64::<BigEndian>()?;
    let run_len = r.read_u64::<BigEndian>()?;
    Ok(PartialEntry { term, df, run_len })
}

/// Decodes one partial posting.
fn decode_posting<R: io::Read>(r: &mut R) -> io::Result<Posting> {
    let document_id = read_str(r)?;
    let weight = r.read_f64::<BigEndian>()?;
    Ok(Posting {
        document_id,
        weight,
    })
}
