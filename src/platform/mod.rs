//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup
//! - Wall-clock time
//! - Which storage backend to use

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use crate::persistence::{InMemoryStore, KvStore, StorageError};
#[cfg(not(target_arch = "wasm32"))]
use crate::persistence::FileStore;
#[cfg(target_arch = "wasm32")]
use crate::persistence::LocalStorageStore;

/// Install the logger for this platform. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Install the logger for this platform. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Whichever storage backend the platform offers
pub enum PlatformStore {
    Memory(InMemoryStore),
    #[cfg(not(target_arch = "wasm32"))]
    File(FileStore),
    #[cfg(target_arch = "wasm32")]
    Local(LocalStorageStore),
}

impl PlatformStore {
    /// Files under `dir`, or memory only when no directory is given
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(dir: Option<&Path>) -> Result<Self, StorageError> {
        match dir {
            Some(dir) => {
                let store = FileStore::open(dir)?;
                log::info!("Using file storage at {}", dir.display());
                Ok(PlatformStore::File(store))
            }
            None => Ok(PlatformStore::Memory(InMemoryStore::new())),
        }
    }

    /// LocalStorage, falling back to memory when the browser refuses it
    #[cfg(target_arch = "wasm32")]
    pub fn open() -> Self {
        match LocalStorageStore::open() {
            Some(store) => PlatformStore::Local(store),
            None => {
                log::warn!("LocalStorage unavailable - progress will not be saved");
                PlatformStore::Memory(InMemoryStore::new())
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        !matches!(self, PlatformStore::Memory(_))
    }
}

impl KvStore for PlatformStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            PlatformStore::Memory(s) => s.get(key),
            #[cfg(not(target_arch = "wasm32"))]
            PlatformStore::File(s) => s.get(key),
            #[cfg(target_arch = "wasm32")]
            PlatformStore::Local(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            PlatformStore::Memory(s) => s.set(key, value),
            #[cfg(not(target_arch = "wasm32"))]
            PlatformStore::File(s) => s.set(key, value),
            #[cfg(target_arch = "wasm32")]
            PlatformStore::Local(s) => s.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match self {
            PlatformStore::Memory(s) => s.remove(key),
            #[cfg(not(target_arch = "wasm32"))]
            PlatformStore::File(s) => s.remove(key),
            #[cfg(target_arch = "wasm32")]
            PlatformStore::Local(s) => s.remove(key),
        }
    }
}
