use std::io::{self, BufRead, Read, Seek, SeekFrom};

use crate::reader::ResourceReader;
use crate::ResourceResult;

/// Readable, seekable stream over one bundled resource.
///
/// Implements [`Read`], [`BufRead`] and [`Seek`], so it plugs into anything
/// that accepts a std reader: `lines()`, `read_to_string()`, parsers, image
/// decoders. All buffering and state live in the owned [`ResourceReader`];
/// the stream adds none of its own.
///
/// Dropping the stream drops the reader and closes the backend handle.
#[derive(Debug)]
pub struct ResourceStream {
    reader: ResourceReader,
}

impl ResourceStream {
    /// Take ownership of an opened reader.
    pub fn new(reader: ResourceReader) -> Self {
        Self { reader }
    }

    /// Name of the underlying resource.
    pub fn name(&self) -> &str {
        self.reader.name()
    }

    /// Absolute offset of the next byte to be read.
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    /// Read a single byte. `None` means end-of-data.
    pub fn read_byte(&mut self) -> ResourceResult<Option<u8>> {
        self.reader.next_byte()
    }

    /// Whether the stream has no more bytes.
    ///
    /// May trigger a backend read when the buffer is empty.
    pub fn is_at_end(&mut self) -> ResourceResult<bool> {
        Ok(self.reader.fill()?.is_empty())
    }

    /// Seek with a platform `whence` code. See [`ResourceReader::seek_raw`].
    pub fn seek_raw(&mut self, offset: i64, whence: i32) -> ResourceResult<u64> {
        self.reader.seek_raw(offset, whence)
    }

    /// Borrow the underlying reader.
    pub fn reader(&self) -> &ResourceReader {
        &self.reader
    }
}

impl From<ResourceReader> for ResourceStream {
    fn from(reader: ResourceReader) -> Self {
        Self::new(reader)
    }
}

impl Read for ResourceStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for ResourceStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
    }
}

impl Seek for ResourceStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.reader.seek(pos)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.reader.position())
    }
}
