//! Application controller.
//!
//! # Responsibility
//! - Own the single list instance for the process.
//! - Hydrate it once from storage, then mirror every applied mutation to the
//!   snapshot writer through the list's mutation hook.
//!
//! # Invariants
//! - Callers get read access to items and the store's mutators, never the
//!   `Vec` itself.
//! - The hook is installed after hydration; hydrating never writes.

use crate::model::item::{Item, ItemId};
use crate::persistence::{PersistenceAdapter, SnapshotWriter};
use crate::storage::{KeyValueStore, SqliteKeyValueStore, StorageError};
use crate::store::{system_clock_ms, Change, ListStore};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::Path;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    Storage(StorageError),
    WriterSpawn(io::Error),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::WriterSpawn(err) => write!(f, "failed to start snapshot writer: {err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::WriterSpawn(err) => Some(err),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// The list plus its persistence wiring.
pub struct TodoApp {
    list: ListStore,
    writer: SnapshotWriter,
}

impl TodoApp {
    /// Opens the app over any key-value store using the system clock.
    pub fn open<S: KeyValueStore + 'static>(store: S) -> AppResult<Self> {
        Self::open_with_clock(store, system_clock_ms)
    }

    /// Opens the app over the SQLite database file at `path`.
    pub fn open_at(path: impl AsRef<Path>) -> AppResult<Self> {
        Self::open(SqliteKeyValueStore::open(path)?)
    }

    /// Opens the app with a custom id clock.
    pub fn open_with_clock<S: KeyValueStore + 'static>(
        store: S,
        clock: fn() -> ItemId,
    ) -> AppResult<Self> {
        let adapter = PersistenceAdapter::new(store);
        let mut list = ListStore::with_clock(clock);
        list.replace_all(adapter.load());

        let writer = SnapshotWriter::spawn(adapter).map_err(AppError::WriterSpawn)?;
        let sink = writer.sink();
        list.set_on_mutate(move |_change, items| {
            sink.submit(items.to_vec());
        });

        info!("event=app_open module=app status=ok items={}", list.len());
        Ok(Self { list, writer })
    }

    pub fn items(&self) -> &[Item] {
        self.list.items()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.list.get(id)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn add(&mut self, text: impl Into<String>) -> Change {
        self.list.add(text)
    }

    pub fn edit(&mut self, id: ItemId, text: impl Into<String>) -> Change {
        self.list.edit(id, text)
    }

    pub fn delete(&mut self, id: ItemId) -> Change {
        self.list.delete(id)
    }

    /// Deletes every item, one delete per item. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let ids: Vec<ItemId> = self.list.items().iter().map(|item| item.id).collect();
        ids.into_iter()
            .filter(|id| self.list.delete(*id).is_applied())
            .count()
    }

    /// Waits for queued snapshot writes. Returns `false` if the writer stopped.
    pub fn flush(&self) -> bool {
        self.writer.flush()
    }

    /// Number of snapshot writes that failed after retrying.
    pub fn failed_writes(&self) -> usize {
        self.writer.failed_writes()
    }

    /// Number of snapshots written since the app was opened.
    pub fn written_snapshots(&self) -> usize {
        self.writer.written_snapshots()
    }
}
