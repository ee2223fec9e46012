//! List item model.
//!
//! # Responsibility
//! - Define the record shared by the store, the snapshot codec and the
//!   presentation shells.
//!
//! # Invariants
//! - Every item is identified by an `ItemId` that is unique within the list.

pub mod item;
