use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::backend::{AssetHandle, AssetManager, OpenMode, Whence};

/// Asset manager that serves resources from a directory on disk.
///
/// The root path is joined with the asset name to form the filesystem path.
/// Used on desktop builds, where assets ship next to the executable instead
/// of inside a platform package.
///
/// Path traversal is prevented by the loader's name normalization which
/// rejects `..` segments before they reach the manager.
///
/// # Example
///
/// ```ignore
/// let loader = ResourceLoader::new(FileSystemAssetManager::new("./assets"));
///
/// // Streams ./assets/shaders/basic.wgsl
/// let stream = loader.open_resource("shaders/basic.wgsl")?;
/// ```
pub struct FileSystemAssetManager {
    root: PathBuf,
}

impl FileSystemAssetManager {
    /// Create a manager rooted at the given directory.
    ///
    /// The directory does not need to exist yet — it is checked at open time.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl AssetManager for FileSystemAssetManager {
    fn open(&self, name: &str, _mode: OpenMode) -> Option<Box<dyn AssetHandle>> {
        let path = self.resolve(name);
        if !path.is_file() {
            return None;
        }
        match File::open(&path) {
            Ok(file) => Some(Box::new(FileAssetHandle { file: Some(file) })),
            Err(err) => {
                log::warn!("Failed to open {}: {err}", path.display());
                None
            }
        }
    }
}

struct FileAssetHandle {
    file: Option<File>,
}

impl AssetHandle for FileAssetHandle {
    fn read(&mut self, buf: &mut [u8]) -> isize {
        let Some(file) = self.file.as_mut() else {
            return -1;
        };
        loop {
            match file.read(buf) {
                Ok(n) => return n as isize,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    log::warn!("Asset file read failed: {err}");
                    return -1;
                }
            }
        }
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> i64 {
        let Some(file) = self.file.as_mut() else {
            return -1;
        };
        let Ok(len) = file.metadata().map(|m| m.len() as i64) else {
            return -1;
        };
        let current = match file.stream_position() {
            Ok(pos) => pos as i64,
            Err(_) => return -1,
        };
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => current,
            Whence::End => len,
        };
        // Files happily seek past their end; assets do not.
        match base.checked_add(offset) {
            Some(target) if (0..=len).contains(&target) => {
                match file.seek(SeekFrom::Start(target as u64)) {
                    Ok(pos) => pos as i64,
                    Err(_) => -1,
                }
            }
            _ => -1,
        }
    }

    fn close(&mut self) {
        self.file = None;
    }
}
