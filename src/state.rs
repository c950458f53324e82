use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::config::{ChatTiming, DEFAULT_STORAGE_KEY};
use crate::error::AppError;
use crate::observability::metrics::Metrics;
use crate::persistence::{self, KeyValueStorage, MemoryStorage, SnapshotWriter};
use crate::store::Store;
use crate::store::events::StoreEvent;

/// What every handler shares: the store behind one lock, its snapshot
/// writer, and the live event feed.
pub struct AppState {
    store: RwLock<Store>,
    generation: AtomicU64,
    snapshots: Arc<SnapshotWriter>,
    pub events_tx: broadcast::Sender<StoreEvent>,
    pub metrics: Metrics,
    pub chat_timing: ChatTiming,
}

impl AppState {
    /// Starts from the snapshot under `storage_key`, or from the seed when
    /// there is none or it cannot be read.
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        storage_key: impl Into<String>,
        event_buffer_size: usize,
        chat_timing: ChatTiming,
    ) -> Self {
        let storage_key = storage_key.into();
        let store = match persistence::load_snapshot(storage.as_ref(), &storage_key) {
            Ok(Some(store)) => {
                info!(key = %storage_key, "restored persisted store");
                store
            }
            Ok(None) => Store::seeded(),
            Err(err) => {
                warn!(error = %err, key = %storage_key, "ignoring persisted store");
                Store::seeded()
            }
        };
        let (events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            store: RwLock::new(store),
            generation: AtomicU64::new(0),
            snapshots: Arc::new(SnapshotWriter::new(storage, storage_key)),
            events_tx,
            metrics: Metrics::new(),
            chat_timing,
        }
    }

    /// Seeded state with throwaway storage and instant chat replies.
    pub fn in_memory(event_buffer_size: usize) -> Self {
        Self::new(
            Arc::new(MemoryStorage::new()),
            DEFAULT_STORAGE_KEY,
            event_buffer_size,
            ChatTiming::immediate(),
        )
    }

    pub fn read<R>(&self, view: impl FnOnce(&Store) -> R) -> Result<R, AppError> {
        let store = self
            .store
            .read()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))?;
        Ok(view(&store))
    }

    /// Applies one store operation under the write lock and serializes the
    /// result there. The snapshot is written on the blocking pool after the
    /// lock is released; events go out once it has landed.
    pub async fn mutate<R>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut Store) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let (result, events, snapshot) = {
            let mut store = self
                .store
                .write()
                .map_err(|_| AppError::Internal("store lock poisoned".to_string()))?;

            let result = apply(&mut store);
            let events = store.drain_events();
            let snapshot = match &result {
                Ok(_) => match persistence::encode_snapshot(&store) {
                    Ok(raw) => Some((self.generation.fetch_add(1, Ordering::SeqCst) + 1, raw)),
                    Err(err) => {
                        error!(error = %err, operation, "failed to encode store");
                        None
                    }
                },
                Err(_) => None,
            };
            (result, events, snapshot)
        };
        self.metrics.record_mutation(operation, result.is_ok());

        if let Some((generation, raw)) = snapshot {
            let snapshots = Arc::clone(&self.snapshots);
            match tokio::task::spawn_blocking(move || snapshots.write(generation, &raw)).await {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => error!(error = %err, operation, "failed to persist store"),
                Err(err) => error!(error = %err, operation, "snapshot task failed"),
            }
        }

        for event in events {
            let _ = self.events_tx.send(event);
        }

        result
    }
}
