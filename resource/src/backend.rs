use crate::ResourceError;

/// Platform `whence` code for seeking from the start of a resource.
pub const SEEK_SET: i32 = 0;
/// Platform `whence` code for seeking from the current backend position.
pub const SEEK_CUR: i32 = 1;
/// Platform `whence` code for seeking from the end of a resource.
pub const SEEK_END: i32 = 2;

/// Reference point for a backend seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Whence {
    /// Offset is absolute, from the first byte.
    Start,
    /// Offset is relative to the backend's current position.
    Current,
    /// Offset is relative to one past the last byte.
    End,
}

impl Whence {
    /// Convert a platform `whence` code.
    ///
    /// Returns [`ResourceError::InvalidArgument`] for any code other than
    /// [`SEEK_SET`], [`SEEK_CUR`] or [`SEEK_END`].
    pub fn from_raw(raw: i32) -> Result<Self, ResourceError> {
        match raw {
            SEEK_SET => Ok(Whence::Start),
            SEEK_CUR => Ok(Whence::Current),
            SEEK_END => Ok(Whence::End),
            other => Err(ResourceError::InvalidArgument(format!(
                "invalid seek direction {other}"
            ))),
        }
    }

    /// The platform `whence` code for this origin.
    pub fn to_raw(self) -> i32 {
        match self {
            Whence::Start => SEEK_SET,
            Whence::Current => SEEK_CUR,
            Whence::End => SEEK_END,
        }
    }
}

/// Access pattern hint passed to the backend when opening a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OpenMode {
    /// No particular access pattern.
    Unknown,
    /// Reads jump around the resource.
    Random,
    /// Reads are mostly sequential with occasional forward seeks.
    #[default]
    Streaming,
    /// The caller wants the whole resource in memory.
    Buffer,
}

/// One opened resource, as issued by an [`AssetManager`].
///
/// The primitives mirror the platform C API: counts and positions are
/// signed and a negative value signals failure. The handle keeps no stream
/// state beyond its backend cursor; buffering, end-of-data detection and
/// error reporting live in [`ResourceReader`](crate::ResourceReader).
///
/// [`close`](AssetHandle::close) is called exactly once, by the reader that
/// owns the handle, when it is dropped.
pub trait AssetHandle: Send {
    /// Read up to `buf.len()` bytes at the current position.
    ///
    /// Returns the number of bytes copied, `0` at end of data, or a
    /// negative value on failure.
    fn read(&mut self, buf: &mut [u8]) -> isize;

    /// Move the backend cursor.
    ///
    /// Returns the new absolute position, or a negative value on failure
    /// (including targets before the start or past the end).
    fn seek(&mut self, offset: i64, whence: Whence) -> i64;

    /// Release the handle. Failures are not reported.
    fn close(&mut self);
}

/// Process-wide capability that resolves resource names to handles.
///
/// Implementations are installed once during platform bootstrap and are
/// read concurrently afterwards, hence `Send + Sync`.
pub trait AssetManager: Send + Sync + 'static {
    /// Open the named resource.
    ///
    /// Returns `None` if the backend cannot locate or open it. The name has
    /// already been normalized by the loader: forward slashes, no leading
    /// slash, no `.` or `..` segments.
    fn open(&self, name: &str, mode: OpenMode) -> Option<Box<dyn AssetHandle>>;
}
