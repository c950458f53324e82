//! Local snapshot of the whole store under a single key.
//!
//! There is no schema versioning: a snapshot either deserializes into the
//! current [`Store`] shape or it is treated as unreadable.

pub mod file;
pub mod memory;

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::store::Store;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// String values under string keys, the only storage the store needs.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Reads the snapshot under `key`. `Ok(None)` means nothing was saved yet.
pub fn load_snapshot(
    storage: &dyn KeyValueStorage,
    key: &str,
) -> Result<Option<Store>, AppError> {
    match storage.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| AppError::Internal(format!("unreadable snapshot {key}: {err}"))),
        None => Ok(None),
    }
}

pub fn encode_snapshot(store: &Store) -> Result<String, AppError> {
    serde_json::to_string(store)
        .map_err(|err| AppError::Internal(format!("failed to serialize snapshot: {err}")))
}

/// Writes numbered snapshots to one key, never letting an older snapshot
/// overwrite a newer one. Writes are serialized.
pub struct SnapshotWriter {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    written: Mutex<u64>,
}

impl SnapshotWriter {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            written: Mutex::new(0),
        }
    }

    /// Stores `raw` as snapshot number `generation`. Returns `false` when a
    /// later snapshot has already been written.
    pub fn write(&self, generation: u64, raw: &str) -> Result<bool, AppError> {
        let mut written = self
            .written
            .lock()
            .map_err(|_| AppError::Internal("snapshot writer lock poisoned".to_string()))?;
        if generation <= *written {
            return Ok(false);
        }
        self.storage.set(&self.key, raw)?;
        *written = generation;
        Ok(true)
    }
}
