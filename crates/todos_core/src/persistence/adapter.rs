//! Load/save of the list snapshot over a `KeyValueStore`.

use super::snapshot::{decode_snapshot, encode_snapshot};
use super::{SnapshotError, SnapshotResult, SNAPSHOT_KEY};
use crate::model::item::Item;
use crate::storage::KeyValueStore;
use log::{error, info, warn};
use std::time::Instant;

/// Durable mirror of the list across process restarts.
pub struct PersistenceAdapter<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads and parses the stored snapshot.
    ///
    /// Returns `Ok(None)` when nothing was ever stored.
    pub fn try_load(&self) -> SnapshotResult<Option<Vec<Item>>> {
        match self.store.get_item(SNAPSHOT_KEY)? {
            Some(raw) => decode_snapshot(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Loads the stored list, treating absent or unreadable data as empty.
    ///
    /// # Side effects
    /// - Emits `snapshot_load` events; malformed data is logged, not raised.
    pub fn load(&self) -> Vec<Item> {
        let started_at = Instant::now();
        match self.try_load() {
            Ok(Some(items)) => {
                info!(
                    "event=snapshot_load module=persistence status=ok items={} duration_ms={}",
                    items.len(),
                    started_at.elapsed().as_millis()
                );
                items
            }
            Ok(None) => {
                info!("event=snapshot_load module=persistence status=ok items=0 stored=false");
                Vec::new()
            }
            Err(SnapshotError::Decode(err)) => {
                warn!(
                    "event=snapshot_load module=persistence status=error error_code=snapshot_malformed error={}",
                    err
                );
                Vec::new()
            }
            Err(err) => {
                error!(
                    "event=snapshot_load module=persistence status=error error_code=storage_read_failed error={}",
                    err
                );
                Vec::new()
            }
        }
    }

    /// Overwrites the stored snapshot with `items`.
    ///
    /// A failed storage write is retried once before the error is returned.
    pub fn save(&self, items: &[Item]) -> SnapshotResult<()> {
        let encoded = encode_snapshot(items)?;
        if let Err(first) = self.store.set_item(SNAPSHOT_KEY, &encoded) {
            warn!(
                "event=snapshot_save module=persistence status=retry items={} error={}",
                items.len(),
                first
            );
            self.store.set_item(SNAPSHOT_KEY, &encoded)?;
        }
        Ok(())
    }
}
