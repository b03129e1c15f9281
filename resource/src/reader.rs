use std::fmt;
use std::io::{self, BufRead, Read, Seek, SeekFrom};

use crate::backend::{AssetHandle, AssetManager, OpenMode, Whence};
use crate::{ResourceError, ResourceResult};

/// Default size of the reader's internal buffer (16 KiB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 16 * 1024;

/// Settings applied when a [`ResourceReader`] opens a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Size of the internal buffer and of each backend read. Clamped to at least 1.
    pub buffer_capacity: usize,
    /// Access hint passed to [`AssetManager::open`].
    pub open_mode: OpenMode,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            open_mode: OpenMode::Streaming,
        }
    }
}

/// Buffered, seekable reader over one opened [`AssetHandle`].
///
/// The backend only offers "read the next N bytes" and "seek"; this type
/// adds lazy refill, end-of-data detection and position tracking on top.
///
/// # Buffer
///
/// `buf[pos..filled]` holds bytes fetched from the backend but not yet
/// handed to the caller. When `pos == filled` the next read issues exactly
/// one backend read of up to `buf.len()` bytes. A zero-byte backend read is
/// end-of-data; a negative one is [`ResourceError::Io`].
///
/// # Seeking
///
/// Every successful seek empties the buffer, even when the target lies
/// inside it, so the next read always comes from the backend at the new
/// position. Relative seeks are relative to the caller-visible position
/// (see [`position`](Self::position)), not to the backend cursor.
///
/// # Ownership
///
/// The handle is opened in [`open`](Self::open) and closed exactly once
/// when the reader is dropped.
pub struct ResourceReader {
    name: String,
    handle: Box<dyn AssetHandle>,
    buf: Box<[u8]>,
    pos: usize,
    filled: usize,
    // Backend cursor: absolute offset just past `buf[..filled]`.
    backend_pos: u64,
}

impl ResourceReader {
    /// Open `name` through `manager` with the default configuration.
    pub fn open(manager: &dyn AssetManager, name: &str) -> ResourceResult<Self> {
        Self::open_with_config(manager, name, &ReaderConfig::default())
    }

    /// Open `name` through `manager`.
    ///
    /// Returns [`ResourceError::NotFound`] if the manager cannot open it.
    pub fn open_with_config(
        manager: &dyn AssetManager,
        name: &str,
        config: &ReaderConfig,
    ) -> ResourceResult<Self> {
        let handle = manager
            .open(name, config.open_mode)
            .ok_or_else(|| ResourceError::NotFound(name.to_owned()))?;
        log::debug!("Opened asset '{name}' ({:?})", config.open_mode);
        Ok(Self::from_handle(name, handle, config.buffer_capacity))
    }

    /// Wrap an already opened handle. The reader takes over closing it.
    pub fn from_handle(
        name: impl Into<String>,
        handle: Box<dyn AssetHandle>,
        capacity: usize,
    ) -> Self {
        Self {
            name: name.into(),
            handle,
            buf: vec![0; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            filled: 0,
            backend_pos: 0,
        }
    }

    /// Name the resource was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the internal buffer.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes fetched from the backend but not yet consumed.
    pub fn buffer(&self) -> &[u8] {
        &self.buf[self.pos..self.filled]
    }

    /// Absolute offset of the next byte the caller will receive.
    pub fn position(&self) -> u64 {
        self.backend_pos - (self.filled - self.pos) as u64
    }

    /// Return unread buffered bytes, refilling from the backend if none remain.
    ///
    /// An empty slice means end-of-data.
    pub fn fill(&mut self) -> ResourceResult<&[u8]> {
        if self.pos >= self.filled {
            self.refill()?;
        }
        Ok(&self.buf[self.pos..self.filled])
    }

    /// Return the next byte, or `None` at end-of-data.
    pub fn next_byte(&mut self) -> ResourceResult<Option<u8>> {
        let byte = self.fill()?.first().copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    /// Move to a new position and drop all buffered bytes.
    ///
    /// Returns the new absolute position, or [`ResourceError::Seek`] if the
    /// backend rejects the target.
    pub fn seek_to(&mut self, target: SeekFrom) -> ResourceResult<u64> {
        let (offset, whence) = match target {
            SeekFrom::Start(offset) => {
                let offset = i64::try_from(offset).map_err(|_| {
                    ResourceError::InvalidArgument(format!(
                        "seek offset {offset} out of range in asset '{}'",
                        self.name
                    ))
                })?;
                (offset, Whence::Start)
            }
            SeekFrom::Current(offset) => (offset, Whence::Current),
            SeekFrom::End(offset) => (offset, Whence::End),
        };
        self.seek_whence(offset, whence)
    }

    /// Seek with a platform `whence` code (`SEEK_SET`, `SEEK_CUR`, `SEEK_END`).
    ///
    /// Unknown codes fail with [`ResourceError::InvalidArgument`] before the
    /// backend is touched.
    pub fn seek_raw(&mut self, offset: i64, whence: i32) -> ResourceResult<u64> {
        let whence = Whence::from_raw(whence).map_err(|_| {
            ResourceError::InvalidArgument(format!(
                "invalid seek direction {whence} in asset '{}'",
                self.name
            ))
        })?;
        self.seek_whence(offset, whence)
    }

    fn seek_whence(&mut self, offset: i64, whence: Whence) -> ResourceResult<u64> {
        let offset = if whence == Whence::Current {
            // The backend cursor is ahead of the caller by the unread bytes.
            let unread = (self.filled - self.pos) as i64;
            offset.checked_sub(unread).ok_or_else(|| ResourceError::Seek {
                name: self.name.clone(),
            })?
        } else {
            offset
        };

        let result = self.handle.seek(offset, whence);
        if result < 0 {
            log::warn!(
                "Seek to {offset} ({whence:?}) failed in asset '{}': {result}",
                self.name
            );
            return Err(ResourceError::Seek {
                name: self.name.clone(),
            });
        }

        self.pos = 0;
        self.filled = 0;
        self.backend_pos = result as u64;
        log::trace!("Asset '{}' seeked to {}", self.name, self.backend_pos);
        Ok(self.backend_pos)
    }

    fn refill(&mut self) -> ResourceResult<()> {
        let result = self.handle.read(&mut self.buf);
        if result < 0 || result as usize > self.buf.len() {
            log::warn!("Read failed in asset '{}': {result}", self.name);
            return Err(ResourceError::Io {
                name: self.name.clone(),
            });
        }

        let n = result as usize;
        self.pos = 0;
        self.filled = n;
        self.backend_pos += n as u64;
        if n == 0 {
            log::trace!("Asset '{}' reached end at {}", self.name, self.backend_pos);
        } else {
            log::trace!("Asset '{}' refilled {n} bytes", self.name);
        }
        Ok(())
    }
}

impl Read for ResourceReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        let available = self.fill()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl BufRead for ResourceReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.fill()?)
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.filled);
    }
}

impl Seek for ResourceReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(self.seek_to(pos)?)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position())
    }
}

impl Drop for ResourceReader {
    fn drop(&mut self) {
        self.handle.close();
        log::debug!("Closed asset '{}'", self.name);
    }
}

impl fmt::Debug for ResourceReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceReader")
            .field("name", &self.name)
            .field("capacity", &self.buf.len())
            .field("buffered", &(self.filled - self.pos))
            .field("position", &self.position())
            .finish()
    }
}
