//! In-memory list store.
//!
//! # Responsibility
//! - Hold the authoritative ordered list of items.
//! - Apply add/edit/delete/replace-all with the silent no-op policy.
//! - Notify one observer after every applied mutation.
//!
//! # Invariants
//! - Ids created by this store are unique, and strictly increasing until
//!   the id range above the largest seen id is exhausted.
//! - Edit and delete never reorder the remaining items.
//! - Ignored calls leave the list untouched and do not fire the hook.

mod id;
mod list_store;

pub use id::{system_clock_ms, IdGenerator};
pub use list_store::{Change, IgnoreReason, ListStore, MutationHook};
