//! Schema steps for the `kv_entries` table.
//!
//! # Invariants
//! - Step `n` in `KV_SCHEMA_STEPS` is schema version `n + 1`; steps are only
//!   ever appended.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - A database from a newer binary is refused, never downgraded.
//! - Only the table is versioned; the JSON snapshot inside it is not.

use crate::storage::{StorageError, StorageResult};
use log::info;
use rusqlite::Connection;

const KV_SCHEMA_STEPS: &[&str] = &[include_str!("0001_kv_entries.sql")];

/// Schema version this binary writes.
pub fn latest_version() -> u32 {
    KV_SCHEMA_STEPS.len() as u32
}

/// Brings the key-value schema up to `latest_version()` in one transaction.
///
/// Returns how many steps were applied (`0` when already current).
pub fn apply_migrations(conn: &mut Connection) -> StorageResult<u32> {
    let from = current_user_version(conn)?;
    let to = latest_version();
    if from > to {
        return Err(StorageError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }

    let pending = &KV_SCHEMA_STEPS[from as usize..];
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for sql in pending {
        tx.execute_batch(sql)?;
    }
    tx.pragma_update(None, "user_version", to)?;
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from} to_version={to}");
    Ok(to - from)
}

/// Reads the schema version recorded on the connection.
pub fn current_user_version(conn: &Connection) -> StorageResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
