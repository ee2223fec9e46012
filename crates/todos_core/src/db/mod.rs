//! SQLite bootstrap for the on-device key-value store.
//!
//! # Responsibility
//! - Open connections and bring the `kv_entries` schema up to date.
//!
//! # Invariants
//! - Key-value reads/writes must not happen before migrations succeed.
//! - Failures surface as `StorageError`, the same error the store reports.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
