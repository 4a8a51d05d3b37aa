//! The documents file.
//!
//! Layout: a `u64` record count, then one `(document_id, source_path, norm)` record per
//! document in id order. Final postings point at records by byte offset. Norms are written
//! as 0.0 and filled in place once the backfill pass has computed them.

use std::{
    collections::{BTreeMap, HashMap},
    fs::{File, OpenOptions},
    io::{self, BufReader, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::{
    IndexError,
    accumulator::DocumentMeta,
    codec::{CountingReader, CountingWriter, WORD_LEN, read_str, write_str},
};

/// Size of the record count header.
pub(crate) const HEADER_LEN: u64 = WORD_LEN;

/// One record of the documents file.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    /// Document identifier.
    pub id: String,
    /// Path the document was read from.
    pub path: PathBuf,
    /// Euclidean length of the document's weight vector.
    pub norm: f64,
}

/// Writes every document with a zero norm.
///
/// Returns the byte offset of each record, keyed by document id.
pub fn write_documents(
    path: &Path,
    documents: &BTreeMap<String, DocumentMeta>,
) -> Result<HashMap<String, u64>, IndexError> {
    let mut writer = CountingWriter::create(path)?;
    writer.write_u64::<BigEndian>(documents.len() as u64)?;

    let mut offsets = HashMap::with_capacity(documents.len());
    for (id, meta) in documents {
        offsets.insert(id.clone(), writer.position());
        write_str(&mut writer, id)?;
        let path = meta.path.to_str().ok_or_else(|| IndexError::NonUtf8Path {
            path: meta.path.clone(),
        })?;
        write_str(&mut writer, path)?;
        writer.write_f64::<BigEndian>(0.0)?;
    }
    writer.finish()?;
    Ok(offsets)
}

/// Decodes the record starting at the reader's position.
fn decode_record<R: io::Read>(r: &mut R) -> io::Result<DocumentRecord> {
    let id = read_str(r)?;
    let path = PathBuf::from(read_str(r)?);
    let norm = r.read_f64::<BigEndian>()?;
    Ok(DocumentRecord { id, path, norm })
}

/// Reads every record with its byte offset, in file order.
pub fn read_documents(path: &Path) -> Result<Vec<(u64, DocumentRecord)>, IndexError> {
    let mut reader = CountingReader::open(path)?;
    let count = reader
        .read_u64::<BigEndian>()
        .map_err(|e| reader.decode_error(e))?;

    let mut records = Vec::new();
    for _ in 0..count {
        let offset = reader.position();
        let record = decode_record(&mut reader).map_err(|e| reader.decode_error(e))?;
        records.push((offset, record));
    }
    if !reader.at_eof()? {
        return Err(reader.corrupt("trailing bytes after last document record"));
    }
    Ok(records)
}

/// Rewrites the norm field of every record in place.
///
/// `norms` is in file order and must hold one value per record. The id and path bytes are
/// skipped, not rewritten.
pub fn write_norms(path: &Path, norms: &[f64]) -> Result<(), IndexError> {
    let mut reader = CountingReader::open(path)?;
    let count = reader
        .read_u64::<BigEndian>()
        .map_err(|e| reader.decode_error(e))?;
    if count != norms.len() as u64 {
        return Err(IndexError::corrupt(
            path,
            0,
            format!("file holds {count} documents, got {} norms", norms.len()),
        ));
    }

    let mut norm_offsets = Vec::with_capacity(norms.len());
    for _ in 0..count {
        decode_record(&mut reader).map_err(|e| reader.decode_error(e))?;
        norm_offsets.push(reader.position() - WORD_LEN);
    }
    drop(reader);

    let mut file = OpenOptions::new().write(true).open(path)?;
    for (offset, norm) in norm_offsets.into_iter().zip(norms) {
        file.seek(SeekFrom::Start(offset))?;
        file.write_f64::<BigEndian>(*norm)?;
    }
    file.flush()?;
    Ok(())
}

/// Random access to document records by offset.
pub struct DocumentStore {
    /// Open documents file.
    reader: BufReader<File>,
    /// Path, for error reporting.
    path: PathBuf,
    /// File length in bytes.
    len: u64,
    /// Number of records from the header.
    count: u64,
}

impl DocumentStore {
    /// Opens a documents file and reads its header.
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let count = reader
            .read_u64::<BigEndian>()
            .map_err(|_| IndexError::corrupt(path, 0, "missing document count header"))?;
        Ok(Self {
            reader,
            path: path.to_path_buf(),
            len,
            count,
        })
    }

    /// Number of documents in the collection.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Reads the record at `offset`, checking it belongs to `expected_id`.
    pub fn read_at(
        &mut self,
        offset: u64,
        expected_id: &str,
    ) -> Result<DocumentRecord, IndexError> {
        if offset < HEADER_LEN || offset >= self.len {
            return Err(IndexError::corrupt(
                &self.path,
                offset,
                format!("document pointer outside file of {} bytes", self.len),
            ));
        }
        self.reader.seek(SeekFrom::Start(offset))?;
        let record = decode_record(&mut self.reader).map_err(|e| {
            IndexError::corrupt(&self.path, offset, format!("undecodable document record: {e}"))
        })?;
        if record.id != expected_id {
            return Err(IndexError::corrupt(
                &self.path,
                offset,
                format!("pointer for {expected_id} leads to document {}", record.id),
            ));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    fn catalog() -> BTreeMap<String, DocumentMeta> {
        ["doc2", "doc1"]
            .into_iter()
            .map(|id| {
                (
                    id.to_string(),
                    DocumentMeta {
                        path: PathBuf::from(format!("/c/{id}.txt")),
                        max_weighted_tf: 1.0,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn records_in_id_order_with_offsets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.bin");
        let offsets = write_documents(&path, &catalog()).unwrap();

        let records = read_documents(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].1.id, "doc1");
        assert_eq!(records[0].0, HEADER_LEN);
        assert_eq!(offsets["doc1"], HEADER_LEN);
        assert_eq!(offsets["doc2"], records[1].0);
        assert_eq!(records[1].1.path, PathBuf::from("/c/doc2.txt"));
        assert_eq!(records[1].1.norm, 0.0);
    }

    #[test]
    fn norms_are_rewritten_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.bin");
        write_documents(&path, &catalog()).unwrap();
        let before = fs::metadata(&path).unwrap().len();

        write_norms(&path, &[1.5, 2.5]).unwrap();
        write_norms(&path, &[1.5, 2.5]).unwrap();

        let records = read_documents(&path).unwrap();
        assert_eq!(records[0].1.norm, 1.5);
        assert_eq!(records[1].1.norm, 2.5);
        assert_eq!(records[1].1.id, "doc2");
        assert_eq!(fs::metadata(&path).unwrap().len(), before);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_is_rejected() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.bin");
        let mut documents = catalog();
        documents.insert(
            "doc3".to_string(),
            DocumentMeta {
                path: PathBuf::from(OsStr::from_bytes(b"/c/doc\xff3.txt")),
                max_weighted_tf: 1.0,
            },
        );

        let err = write_documents(&path, &documents).unwrap_err();
        assert!(matches!(err, IndexError::NonUtf8Path { .. }));
    }

    #[test]
    fn norm_count_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.bin");
        write_documents(&path, &catalog()).unwrap();
        assert!(write_norms(&path, &[1.0]).is_err());
    }

    #[test]
    fn pointer_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.bin");
        let offsets = write_documents(&path, &catalog()).unwrap();
        let mut store = DocumentStore::open(&path).unwrap();
        assert_eq!(store.count(), 2);

        let record = store.read_at(offsets["doc2"], "doc2").unwrap();
        assert_eq!(record.path, PathBuf::from("/c/doc2.txt"));

        for (offset, id) in [(0, "doc1"), (offsets["doc1"], "doc2"), (10_000, "doc1")] {
            let err = store.read_at(offset, id).unwrap_err();
            assert!(matches!(err, IndexError::Corrupt { .. }), "offset {offset}");
        }
    }
}
