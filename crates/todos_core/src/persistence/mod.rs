//! Persistence adapter between the list store and key-value storage.
//!
//! # Responsibility
//! - Encode/decode the whole list as one JSON snapshot.
//! - Load once at startup, failing open to an empty list.
//! - Write snapshots off the caller's thread, newest-wins.
//!
//! # Invariants
//! - The snapshot lives under exactly one key, `SNAPSHOT_KEY`.
//! - Every save overwrites the whole value; there are no deltas.

use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod adapter;
mod snapshot;
mod writer;

pub use adapter::PersistenceAdapter;
pub use snapshot::{decode_snapshot, encode_snapshot};
pub use writer::{SnapshotSink, SnapshotWriter};

/// Storage key holding the serialized list.
pub const SNAPSHOT_KEY: &str = "todos";

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug)]
pub enum SnapshotError {
    Storage(StorageError),
    Encode(serde_json::Error),
    Decode(serde_json::Error),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Decode(err) => write!(f, "malformed snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Encode(err) | Self::Decode(err) => Some(err),
        }
    }
}

impl From<StorageError> for SnapshotError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
