//! Core domain logic for the todos app.
//! This crate owns the list, its mutation rules and its persisted snapshot.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod storage;
pub mod store;

pub use app::TodoApp;
pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemId};
pub use persistence::{
    decode_snapshot, encode_snapshot, PersistenceAdapter, SnapshotError, SnapshotResult,
    SnapshotSink, SnapshotWriter, SNAPSHOT_KEY,
};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use store::{Change, IgnoreReason, ListStore};

/// Fixed outbound link shown in the footer of every presentation shell.
pub const ABOUT_URL: &str = "https://github.com/AyanavaKarmakar";

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
