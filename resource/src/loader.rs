use std::fmt;
use std::io::Read;
use std::sync::{Arc, OnceLock};

use crate::backend::AssetManager;
use crate::name;
use crate::reader::{ReaderConfig, ResourceReader};
use crate::stream::ResourceStream;
use crate::{ResourceError, ResourceResult};

/// Process-wide asset manager, installed once during platform bootstrap.
static ASSET_MANAGER: OnceLock<Arc<dyn AssetManager>> = OnceLock::new();

/// Install the process-wide asset manager.
///
/// Returns `false` if a manager was already installed; the first one wins.
pub fn install_asset_manager(manager: impl AssetManager) -> bool {
    let installed = ASSET_MANAGER.set(Arc::new(manager)).is_ok();
    if installed {
        log::info!("Asset manager installed");
    } else {
        log::warn!("Asset manager already installed, ignoring");
    }
    installed
}

/// Open a resource through the process-wide asset manager.
///
/// Fails with [`ResourceError::NotInitialized`] before
/// [`install_asset_manager`] has been called.
pub fn open_resource(name: &str) -> ResourceResult<ResourceStream> {
    ResourceLoader::global().open_resource(name)
}

/// Read a whole resource through the process-wide asset manager.
pub fn load_resource(name: &str) -> ResourceResult<String> {
    ResourceLoader::global().load_resource(name)
}

/// Resolves resource names to [`ResourceStream`]s.
///
/// Holds the asset manager capability explicitly, so code under test can use
/// its own manager instead of the process-wide one. Every open performs a
/// fresh backend open; nothing is cached.
///
/// `Clone` is cheap (Arc internals).
///
/// # Example
///
/// ```ignore
/// let assets = MemoryAssetManager::new();
/// assets.insert("shaders/basic.wgsl", shader_bytes);
///
/// let loader = ResourceLoader::new(assets);
/// let source = loader.load_resource("shaders/basic.wgsl")?;
/// ```
#[derive(Clone, Default)]
pub struct ResourceLoader {
    manager: Option<Arc<dyn AssetManager>>,
    config: ReaderConfig,
}

impl ResourceLoader {
    /// Create a loader over the given manager.
    pub fn new(manager: impl AssetManager) -> Self {
        Self::from_shared(Arc::new(manager))
    }

    /// Create a loader over an already shared manager.
    pub fn from_shared(manager: Arc<dyn AssetManager>) -> Self {
        Self {
            manager: Some(manager),
            config: ReaderConfig::default(),
        }
    }

    /// A loader over the process-wide manager, or an uninitialized loader
    /// if none has been installed yet.
    pub fn global() -> Self {
        Self {
            manager: ASSET_MANAGER.get().cloned(),
            config: ReaderConfig::default(),
        }
    }

    /// Replace the reader configuration used for subsequent opens.
    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Reader configuration used for opens.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Whether a manager capability is available.
    pub fn is_initialized(&self) -> bool {
        self.manager.is_some()
    }

    /// Open a resource as a stream.
    ///
    /// The name is normalized first (see [`name::normalize`]).
    pub fn open_resource(&self, raw_name: &str) -> ResourceResult<ResourceStream> {
        let manager = self
            .manager
            .as_deref()
            .ok_or(ResourceError::NotInitialized)?;
        let name = name::normalize(raw_name)?;
        let reader = ResourceReader::open_with_config(manager, &name, &self.config)?;
        Ok(ResourceStream::new(reader))
    }

    /// Read a whole resource into memory.
    pub fn load_resource_bytes(&self, raw_name: &str) -> ResourceResult<Vec<u8>> {
        let mut stream = self.open_resource(raw_name)?;
        let mut bytes = Vec::new();
        stream
            .read_to_end(&mut bytes)
            .map_err(|err| ResourceError::from_io(err, stream.name()))?;
        log::debug!("Loaded asset '{}' ({} bytes)", stream.name(), bytes.len());
        Ok(bytes)
    }

    /// Read a whole resource into a string.
    ///
    /// Fails with [`ResourceError::InvalidUtf8`] if the content is not UTF-8.
    pub fn load_resource(&self, raw_name: &str) -> ResourceResult<String> {
        let bytes = self.load_resource_bytes(raw_name)?;
        String::from_utf8(bytes).map_err(|_| {
            // Report the normalized name, as every other error does.
            let name = name::normalize(raw_name).unwrap_or_else(|_| raw_name.to_owned());
            ResourceError::InvalidUtf8(name)
        })
    }
}

impl fmt::Debug for ResourceLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLoader")
            .field("initialized", &self.is_initialized())
            .field("config", &self.config)
            .finish()
    }
}
