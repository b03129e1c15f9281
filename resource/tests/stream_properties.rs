use std::io::{BufRead, Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use redlilium_resource::{
    AssetHandle, AssetManager, MemoryAssetManager, OpenMode, ReaderConfig, ResourceError,
    ResourceLoader, ResourceReader, ResourceStream, Whence, DEFAULT_BUFFER_CAPACITY,
};

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 256) as u8).collect()
}

fn loader(data: Vec<u8>, capacity: usize) -> (MemoryAssetManager, ResourceLoader) {
    let assets = MemoryAssetManager::new();
    assets.insert("res", data);
    let loader = ResourceLoader::new(assets.clone()).with_config(ReaderConfig {
        buffer_capacity: capacity,
        ..ReaderConfig::default()
    });
    (assets, loader)
}

/// Reads byte by byte until end-of-data, then reports whether a further
/// bulk read also comes back empty.
fn read_all_then_eof(stream: &mut ResourceStream) -> (Vec<u8>, bool) {
    let mut out = Vec::new();
    while let Some(byte) = stream.read_byte().unwrap() {
        out.push(byte);
    }
    let mut scratch = [0u8; 8];
    let still_at_end = stream.read(&mut scratch).unwrap() == 0;
    (out, still_at_end)
}

// ---------------------------------------------------------------------------
// Sequential reads
// ---------------------------------------------------------------------------

#[test]
fn sequential_read_yields_exact_length_at_default_capacity() {
    let cap = DEFAULT_BUFFER_CAPACITY;
    for len in [0, 100, cap - 1, cap, cap + 1, cap * 5, cap * 5 + 17] {
        let data = pattern(len);
        let (assets, loader) = loader(data.clone(), cap);
        let mut stream = loader.open_resource("res").unwrap();

        let (out, still_at_end) = read_all_then_eof(&mut stream);
        assert_eq!(out.len(), len);
        assert_eq!(out, data);
        assert!(still_at_end, "read after end-of-data returned bytes at length {len}");
        drop(stream);
        assert_eq!(assets.open_handles(), 0);
    }
}

#[test]
fn bulk_read_matches_for_every_length_around_capacity() {
    let cap = 16;
    for len in 0..=cap * 4 + 1 {
        let data = pattern(len);
        let (_assets, loader) = loader(data.clone(), cap);
        let mut out = Vec::new();
        loader
            .open_resource("res")
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, data, "length {len}");
    }
}

// ---------------------------------------------------------------------------
// Seeking
// ---------------------------------------------------------------------------

#[test]
fn seek_then_read_equals_skip() {
    let cap = 32;
    let data = pattern(cap * 3 + 5);
    let (_assets, loader) = loader(data.clone(), cap);

    for k in 0..=data.len() {
        let mut sought = loader.open_resource("res").unwrap();
        sought.seek(SeekFrom::Start(k as u64)).unwrap();
        let mut tail = Vec::new();
        sought.read_to_end(&mut tail).unwrap();

        let mut skipped = loader.open_resource("res").unwrap();
        let mut discard = vec![0u8; k];
        skipped.read_exact(&mut discard).unwrap();
        let mut rest = Vec::new();
        skipped.read_to_end(&mut rest).unwrap();

        assert_eq!(tail, rest, "offset {k}");
        assert_eq!(tail, &data[k..]);
    }
}

#[test]
fn seek_end_zero_is_end_of_data() {
    let (_assets, loader) = loader(pattern(100), 16);
    let mut stream = loader.open_resource("res").unwrap();
    stream.read_byte().unwrap();
    assert_eq!(stream.seek(SeekFrom::End(0)).unwrap(), 100);
    assert_eq!(stream.read_byte().unwrap(), None);
    assert!(stream.is_at_end().unwrap());
}

#[test]
fn backwards_seek_into_consumed_data() {
    let data = pattern(64);
    let (_assets, loader) = loader(data.clone(), 16);
    let mut stream = loader.open_resource("res").unwrap();

    let mut head = [0u8; 40];
    stream.read_exact(&mut head).unwrap();
    assert_eq!(stream.seek(SeekFrom::Current(-30)).unwrap(), 10);
    assert_eq!(stream.read_byte().unwrap(), Some(data[10]));
    assert_eq!(stream.seek(SeekFrom::End(-4)).unwrap(), 60);
    let mut tail = Vec::new();
    stream.read_to_end(&mut tail).unwrap();
    assert_eq!(tail, &data[60..]);
}

#[test]
fn out_of_range_seek_is_seek_error() {
    let (_assets, loader) = loader(pattern(10), 4);
    let mut stream = loader.open_resource("res").unwrap();
    for target in [SeekFrom::Start(11), SeekFrom::End(1), SeekFrom::Current(-1)] {
        let err = stream.seek(target).unwrap_err();
        match ResourceError::from_io(err, "unused") {
            ResourceError::Seek { name } => assert_eq!(name, "res"),
            other => panic!("expected seek error, got {other:?}"),
        }
    }
    assert_eq!(stream.position(), 0);
}

// ---------------------------------------------------------------------------
// Line reads
// ---------------------------------------------------------------------------

#[test]
fn lines_straddling_buffer_boundaries() {
    let text = "alpha\nbeta gamma\n\ndelta epsilon zeta\neta";
    let (_assets, loader) = loader(text.as_bytes().to_vec(), 5);
    let stream = loader.open_resource("res").unwrap();
    let lines: Vec<String> = stream.lines().collect::<Result<_, _>>().unwrap();
    assert_eq!(lines, text.lines().collect::<Vec<_>>());
}

// ---------------------------------------------------------------------------
// Backend failures
// ---------------------------------------------------------------------------

/// Backend whose handles fail after a fixed number of reads and record closes.
#[derive(Clone, Default)]
struct FlakyManager {
    data: Vec<u8>,
    reads_before_failure: usize,
    closes: Arc<AtomicUsize>,
    opens: Arc<AtomicUsize>,
}

struct FlakyHandle {
    data: Vec<u8>,
    pos: usize,
    reads_left: usize,
    closes: Arc<AtomicUsize>,
}

impl AssetManager for FlakyManager {
    fn open(&self, name: &str, mode: OpenMode) -> Option<Box<dyn AssetHandle>> {
        assert_eq!(mode, OpenMode::Streaming);
        if name != "flaky" {
            return None;
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(FlakyHandle {
            data: self.data.clone(),
            pos: 0,
            reads_left: self.reads_before_failure,
            closes: self.closes.clone(),
        }))
    }
}

impl AssetHandle for FlakyHandle {
    fn read(&mut self, buf: &mut [u8]) -> isize {
        if self.reads_left == 0 {
            return -5;
        }
        self.reads_left -= 1;
        let n = (self.data.len() - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        n as isize
    }

    fn seek(&mut self, _offset: i64, _whence: Whence) -> i64 {
        -1
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

fn flaky(len: usize, reads_before_failure: usize) -> FlakyManager {
    FlakyManager {
        data: pattern(len),
        reads_before_failure,
        ..FlakyManager::default()
    }
}

#[test]
fn read_failure_is_io_error_naming_resource() {
    let manager = flaky(100, 2);
    let config = ReaderConfig {
        buffer_capacity: 16,
        ..ReaderConfig::default()
    };
    let mut reader = ResourceReader::open_with_config(&manager, "flaky", &config).unwrap();

    for expected in &pattern(32) {
        assert_eq!(reader.next_byte().unwrap(), Some(*expected));
    }
    let err = reader.next_byte().unwrap_err();
    assert!(matches!(&err, ResourceError::Io { name } if name == "flaky"));
    assert_eq!(err.to_string(), "error reading asset 'flaky'");

    drop(reader);
    assert_eq!(manager.closes.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_load_still_closes_handle() {
    let manager = flaky(100, 1);
    let loader = ResourceLoader::new(manager.clone()).with_config(ReaderConfig {
        buffer_capacity: 8,
        ..ReaderConfig::default()
    });

    let err = loader.load_resource("flaky").unwrap_err();
    assert!(matches!(err, ResourceError::Io { name } if name == "flaky"));
    assert_eq!(manager.opens.load(Ordering::SeqCst), 1);
    assert_eq!(manager.closes.load(Ordering::SeqCst), 1);
}

#[test]
fn backend_seek_failure_is_seek_error() {
    let manager = flaky(10, 10);
    let mut stream: ResourceStream = ResourceReader::open(&manager, "flaky").unwrap().into();
    let err = stream.seek(SeekFrom::Start(0)).unwrap_err();
    assert!(matches!(
        ResourceError::from_io(err, "unused"),
        ResourceError::Seek { .. }
    ));
}

#[test]
fn unknown_name_opens_nothing() {
    let manager = flaky(10, 10);
    let loader = ResourceLoader::new(manager.clone());
    assert!(matches!(
        loader.open_resource("other"),
        Err(ResourceError::NotFound(name)) if name == "other"
    ));
    assert_eq!(manager.opens.load(Ordering::SeqCst), 0);
    assert_eq!(manager.closes.load(Ordering::SeqCst), 0);
}

/// Handle that claims to have read more bytes than it was given room for.
struct OverreportingHandle;

impl AssetHandle for OverreportingHandle {
    fn read(&mut self, buf: &mut [u8]) -> isize {
        buf.len() as isize + 1
    }

    fn seek(&mut self, _offset: i64, _whence: Whence) -> i64 {
        0
    }

    fn close(&mut self) {}
}

#[test]
fn overreported_read_is_io_error() {
    let mut reader = ResourceReader::from_handle("bad", Box::new(OverreportingHandle), 4);
    assert!(matches!(
        reader.next_byte(),
        Err(ResourceError::Io { name }) if name == "bad"
    ));
}
