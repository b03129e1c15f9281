use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::backend::{AssetHandle, AssetManager, OpenMode, Whence};

/// In-memory asset manager for tests and embedded assets.
///
/// Thread-safe and mutable even after being installed in a
/// [`ResourceLoader`](crate::ResourceLoader). Handles follow the platform
/// contract: seeking outside `[0, len]` fails with `-1` rather than clamping.
///
/// The manager counts handles that have been opened but not yet closed,
/// which makes handle leaks observable in tests.
///
/// # Example
///
/// ```ignore
/// let assets = MemoryAssetManager::new();
/// assets.insert("config/settings.json", b"{}".to_vec());
///
/// let loader = ResourceLoader::new(assets);
/// let text = loader.load_resource("config/settings.json")?;
/// ```
#[derive(Clone, Default)]
pub struct MemoryAssetManager {
    files: Arc<RwLock<HashMap<String, Arc<[u8]>>>>,
    open_handles: Arc<AtomicUsize>,
}

impl MemoryAssetManager {
    /// Create an empty in-memory manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource under the given name.
    ///
    /// The name should use forward slashes and have no leading slash.
    /// Overwrites any existing resource; handles already open keep
    /// reading the old content.
    pub fn insert(&self, name: impl Into<String>, data: impl Into<Arc<[u8]>>) {
        self.files.write().insert(name.into(), data.into());
    }

    /// Remove a resource, returning its data if it existed.
    pub fn remove(&self, name: &str) -> Option<Arc<[u8]>> {
        self.files.write().remove(name)
    }

    /// Number of handles opened and not yet closed.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::Acquire)
    }
}

impl AssetManager for MemoryAssetManager {
    fn open(&self, name: &str, _mode: OpenMode) -> Option<Box<dyn AssetHandle>> {
        let data = self.files.read().get(name).cloned()?;
        self.open_handles.fetch_add(1, Ordering::AcqRel);
        Some(Box::new(MemoryAssetHandle {
            data,
            pos: 0,
            open_handles: Some(self.open_handles.clone()),
        }))
    }
}

struct MemoryAssetHandle {
    data: Arc<[u8]>,
    pos: usize,
    // Taken on close so a double close cannot skew the counter.
    open_handles: Option<Arc<AtomicUsize>>,
}

impl AssetHandle for MemoryAssetHandle {
    fn read(&mut self, buf: &mut [u8]) -> isize {
        let remaining = &self.data[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        n as isize
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> i64 {
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.pos as i64,
            Whence::End => self.data.len() as i64,
        };
        match base.checked_add(offset) {
            Some(target) if (0..=self.data.len() as i64).contains(&target) => {
                self.pos = target as usize;
                target
            }
            _ => -1,
        }
    }

    fn close(&mut self) {
        if let Some(counter) = self.open_handles.take() {
            counter.fetch_sub(1, Ordering::AcqRel);
        }
    }
}
