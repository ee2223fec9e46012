//! Item domain model.
//!
//! # Responsibility
//! - Define the canonical `{id, text}` record.
//!
//! # Invariants
//! - `id` never changes for the lifetime of an item, including across edits.
//! - `text` is stored verbatim; emptiness rules live in the store, not here.

use serde::{Deserialize, Serialize};

/// Identifier of one list item.
///
/// Epoch-millisecond shaped value, serialized as a plain JSON number.
pub type ItemId = i64;

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
}

impl Item {
    /// Creates an item with a caller-provided id.
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Returns a copy carrying the same id and replacement text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            id: self.id,
            text: text.into(),
        }
    }
}
