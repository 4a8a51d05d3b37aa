//! The final vocabulary and postings formats.
//!
//! Vocabulary records are `(term, df, postings_offset, postings_len)` in term order.
//! Each run in the postings file is `df` records of `(document_id, weight, document_pointer)`.

use std::{io, path::Path};

use byteorder::{BigEndian, ReadBytesExt};

use crate::{
    IndexError,
    analyzer::Term,
    codec::{CountingReader, read_str},
};

/// Location and size of one term's postings run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyEntry {
    /// Number of documents containing the term.
    pub document_frequency: u64,
    /// Byte offset of the run in the postings file.
    pub postings_offset: u64,
    /// Byte length of the run.
    pub postings_len: u64,
}

/// One posting in the final postings file.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPosting {
    /// Identifier of the document.
    pub document_id: String,
    /// Normalized, field-weighted term frequency.
    pub weight: f64,
    /// Byte offset of the document's record in the documents file.
    pub document_pointer: u64,
}

/// Reads the whole final vocabulary, in term order.
pub fn read_vocabulary(path: &Path) -> Result<Vec<(Term, VocabularyEntry)>, IndexError> {
    let mut reader = CountingReader::open(path)?;
    let mut entries = Vec::new();
    while !reader.at_eof()? {
        let entry = decode_entry(&mut reader).map_err(|e| reader.decode_error(e))?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Decodes one final vocabulary record.
fn decode_entry<R: io::Read>(r: &mut R) -> io::Result<(Term, VocabularyEntry)> {
    let term = read_str(r)?;
    let document_frequency = r.read_u64::<BigEndian>()?;
    let postings_offset = r.read_u64::<BigEndian>()?;
    let postings_len = r.read_u64::<BigEndian>()?;
    Ok((
        term,
        VocabularyEntry {
            document_frequency,
            postings_offset,
            postings_len,
        },
    ))
}

/// Decodes one final posting.
fn decode_posting<R: io::Read>(r: &mut R) -> io::Result<IndexedPosting> {
    let document_id = read_str(r)?;
    let weight = r.read_f64::<BigEndian>()?;
    let document_pointer = r.read_u64::<BigEndian>()?;
    Ok(IndexedPosting {
        document_id,
        weight,
        document_pointer,
    })
}

/// Reads the run described by `entry`, with `reader` positioned at its start.
///
/// `on_posting` is called for each posting as it is decoded; returning an error stops the
/// read. Consuming more bytes than the entry declares, or a posting count that disagrees
/// with its document frequency, is `Corrupt`.
pub(crate) fn read_run<R, F>(
    reader: &mut R,
    path: &Path,
    entry: &VocabularyEntry,
    mut on_posting: F,
) -> Result<(), IndexError>
where
    R: io::Read,
    F: FnMut(IndexedPosting) -> Result<(), IndexError>,
{
    let mut counting = CountedRead {
        inner: reader,
        consumed: 0,
    };
    let mut count: u64 = 0;
    while counting.consumed < entry.postings_len {
        let posting = decode_posting(&mut counting).map_err(|e| {
            IndexError::corrupt(
                path,
                entry.postings_offset.wrapping_add(counting.consumed),
                format!("undecodable posting: {e}"),
            )
        })?;
        count += 1;
        on_posting(posting)?;
    }
    let consumed = counting.consumed;
    if consumed != entry.postings_len {
        return Err(IndexError::corrupt(
            path,
            entry.postings_offset,
            format!(
                "posting run overran its declared length: read {consumed} of {} bytes",
                entry.postings_len
            ),
        ));
    }
    if count != entry.document_frequency {
        return Err(IndexError::corrupt(
            path,
            entry.postings_offset,
            format!(
                "posting run holds {count} postings, vocabulary declares {}",
                entry.document_frequency
            ),
        ));
    }
    Ok(())
}

/// Counts bytes read through a borrowed reader.
struct CountedRead<'a, R> {
    /// Wrapped reader.
    inner: &'a mut R,
    /// Bytes read so far.
    consumed: u64,
}

impl<R: io::Read> io::Read for CountedRead<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.consumed = self.consumed.wrapping_add(n as u64);
        Ok(n)
    }
}
