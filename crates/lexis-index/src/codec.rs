//! Binary record encoding shared by every index file.
//!
//! All integers and floats are big-endian. Strings are a `u16` byte length followed by
//! their UTF-8 bytes. Readers and writers count bytes so that run lengths and document
//! pointers can be taken from the stream position without seeking.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::IndexError;

/// Encoded size of an `f64` or `u64` field.
pub(crate) const WORD_LEN: u64 = 8;

/// Writes a length-prefixed UTF-8 string.
pub(crate) fn write_str<W: Write>(w: &mut W, s: &str) -> Result<(), IndexError> {
    let len = u16::try_from(s.len()).map_err(|_| IndexError::StringTooLong { len: s.len() })?;
    w.write_u16::<BigEndian>(len)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

/// Reads a length-prefixed UTF-8 string.
pub(crate) fn read_str<R: Read>(r: &mut R) -> io::Result<String> {
    let len = r.read_u16::<BigEndian>()?;
    let mut buf = vec![0; usize::from(len)];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Bytes between two stream positions.
///
/// Positions are `u64` counters that wrap, so an end below its start is a wrapped
/// counter, never a negative length.
pub(crate) fn span(start: u64, end: u64) -> u64 {
    end.wrapping_sub(start)
}

/// A buffered file writer that tracks how many bytes it has written.
pub(crate) struct CountingWriter {
    /// Underlying buffered file.
    inner: BufWriter<File>,
    /// Bytes written so far.
    position: u64,
}

impl CountingWriter {
    /// Creates (or truncates) a file for writing.
    pub(crate) fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            inner: BufWriter::new(File::create(path)?),
            position: 0,
        })
    }

    /// Current byte offset from the start of the file.
    pub(crate) fn position(&self) -> u64 {
        self.position
    }

    /// Moves the position counter without writing.
    #[cfg(test)]
    pub(crate) fn set_position(&mut self, position: u64) {
        self.position = position;
    }

    /// Flushes buffered bytes to the file.
    pub(crate) fn finish(mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Write for CountingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position = self.position.wrapping_add(n as u64);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// A buffered file reader that tracks its byte offset.
pub(crate) struct CountingReader {
    /// Underlying buffered file.
    inner: BufReader<File>,
    /// Path, for error reporting.
    path: PathBuf,
    /// Bytes consumed so far.
    position: u64,
}

impl CountingReader {
    /// Opens a file for sequential reading.
    pub(crate) fn open(path: &Path) -> io::Result<Self> {
        Ok(Self {
            inner: BufReader::new(File::open(path)?),
            path: path.to_path_buf(),
            position: 0,
        })
    }

    /// Current byte offset from the start of the file.
    pub(crate) fn position(&self) -> u64 {
        self.position
    }

    /// Path of the file being read.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if no bytes remain.
    pub(crate) fn at_eof(&mut self) -> io::Result<bool> {
        Ok(self.inner.fill_buf()?.is_empty())
    }

    /// Builds a `Corrupt` error at the current offset.
    pub(crate) fn corrupt(&self, message: impl Into<String>) -> IndexError {
        IndexError::corrupt(&self.path, self.position, message)
    }

    /// Maps an I/O error to `Corrupt` when it means the file ended early or held bad bytes.
    pub(crate) fn decode_error(&self, err: io::Error) -> IndexError {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => self.corrupt("unexpected end of file"),
            io::ErrorKind::InvalidData => self.corrupt(err.to_string()),
            _ => IndexError::Io(err),
        }
    }

    /// Copies exactly `len` bytes to `out`.
    pub(crate) fn copy_exact<W: Write>(&mut self, len: u64, out: &mut W) -> Result<(), IndexError> {
        let copied = io::copy(&mut self.by_ref().take(len), out)?;
        if copied != len {
            return Err(self.corrupt(format!(
                "run truncated: expected {len} bytes, found {copied}"
            )));
        }
        Ok(())
    }
}

impl Read for CountingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position = self.position.wrapping_add(n as u64);
        Ok(n)
    }
}
