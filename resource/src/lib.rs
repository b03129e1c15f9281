//! Read-only access to resources bundled with the RedLilium engine.
//!
//! Platform asset stores (Android's `AAssetManager` and friends) hand out
//! opaque handles with a bare "read N bytes" / "seek" API instead of file
//! descriptors. This crate turns those handles into ordinary std streams.
//!
//! # Architecture
//!
//! ```text
//! ResourceLoader ──> AssetManager::open(name) ──> Box<dyn AssetHandle>
//!       │                                               │
//!       └──────> ResourceStream ──owns──> ResourceReader ┘
//! ```
//!
//! - [`ResourceReader`] owns one handle and a 16 KiB buffer. It refills
//!   lazily, tracks the caller-visible position, maps a zero-byte backend
//!   read to end-of-data and negative results to errors, and drops its
//!   buffer on every seek. The handle is closed when the reader drops.
//! - [`ResourceStream`] exposes the reader as [`std::io::Read`],
//!   [`std::io::BufRead`] and [`std::io::Seek`].
//! - [`ResourceLoader`] resolves names through an [`AssetManager`]
//!   capability. The process-wide manager is installed once with
//!   [`install_asset_manager`] and used by [`open_resource`] and
//!   [`load_resource`].
//!
//! ```ignore
//! // Platform bootstrap:
//! install_asset_manager(FileSystemAssetManager::new("./assets"));
//!
//! // Anywhere afterwards:
//! let source = load_resource("shaders/basic.wgsl")?;
//! for line in open_resource("levels/01.txt")?.lines() {
//!     // ...
//! }
//! ```
//!
//! # Managers
//!
//! - [`MemoryAssetManager`] — In-memory resources for tests and embedded assets
//! - [`FileSystemAssetManager`] — A directory on disk (native only)
//!
//! Platform integrations implement [`AssetManager`] and [`AssetHandle`]
//! over their native API.

mod backend;
mod error;
#[cfg(all(feature = "filesystem", not(target_arch = "wasm32")))]
mod filesystem;
mod loader;
mod memory;
pub mod name;
mod reader;
mod stream;

pub use backend::{AssetHandle, AssetManager, OpenMode, Whence, SEEK_CUR, SEEK_END, SEEK_SET};
pub use error::{ResourceError, ResourceResult};
#[cfg(all(feature = "filesystem", not(target_arch = "wasm32")))]
pub use filesystem::FileSystemAssetManager;
pub use loader::{install_asset_manager, load_resource, open_resource, ResourceLoader};
pub use memory::MemoryAssetManager;
pub use reader::{ReaderConfig, ResourceReader, DEFAULT_BUFFER_CAPACITY};
pub use stream::ResourceStream;
