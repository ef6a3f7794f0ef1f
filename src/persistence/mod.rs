//! Local persistence for run outcomes
//!
//! Features:
//! - Pluggable string key-value backends (memory, files, LocalStorage)
//! - Mistake log and best-run echo path
//! - Best effort: storage failures and corrupt data degrade to defaults

pub mod backend;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::mistakes::{DeathRecord, MistakeLog};

pub use backend::{FileStore, InMemoryStore};
#[cfg(target_arch = "wasm32")]
pub use backend::LocalStorageStore;

/// Storage keys
pub const MISTAKES_KEY: &str = "loop_dash_mistakes";
pub const BEST_PATH_KEY: &str = "loop_dash_best_path";
pub const BEST_SCORE_KEY: &str = "loop_dash_best_score";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string key-value store, shaped like browser LocalStorage
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read a JSON value, treating missing, unreadable or malformed data as absent
pub fn load_json<T: DeserializeOwned>(store: &impl KvStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read {}: {}", key, e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring malformed {}: {}", key, e);
            None
        }
    }
}

/// Write a JSON value, logging and swallowing any failure
pub fn save_json<T: Serialize + ?Sized>(store: &mut impl KvStore, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|json| store.set(key, &json));
    if let Err(e) = result {
        log::warn!("Failed to write {}: {}", key, e);
    }
}

/// Mistake log and echo path, layered over any [`KvStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryService<S: KvStore> {
    store: S,
}

impl<S: KvStore> MemoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Logged deaths, newest first
    pub fn mistakes(&self) -> MistakeLog {
        load_json(&self.store, MISTAKES_KEY).unwrap_or_default()
    }

    /// Highest score ever recorded (0 if none)
    pub fn best_score(&self) -> u64 {
        load_json::<f64>(&self.store, BEST_SCORE_KEY)
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(|s| s as u64)
            .unwrap_or(0)
    }

    /// Position trace of the best run (empty if none)
    pub fn best_path(&self) -> Vec<f32> {
        load_json(&self.store, BEST_PATH_KEY).unwrap_or_default()
    }

    /// Log a death; replace the echo path if this beats the best score
    ///
    /// Returns true when the run set a new best.
    pub fn record_mistake(
        &mut self,
        score: u64,
        y: f32,
        cause: &str,
        path: &[f32],
        timestamp: f64,
    ) -> bool {
        let mut log = self.mistakes();
        log.push(DeathRecord {
            score,
            y,
            cause: cause.to_string(),
            timestamp,
        });
        save_json(&mut self.store, MISTAKES_KEY, &log);

        if score > self.best_score() {
            save_json(&mut self.store, BEST_SCORE_KEY, &score);
            save_json(&mut self.store, BEST_PATH_KEY, path);
            log::info!("New best score {} ({} path samples)", score, path.len());
            return true;
        }
        false
    }

    /// Forget everything
    pub fn clear(&mut self) {
        for key in [MISTAKES_KEY, BEST_PATH_KEY, BEST_SCORE_KEY] {
            if let Err(e) = self.store.remove(key) {
                log::warn!("Failed to clear {}: {}", key, e);
            }
        }
    }
}
