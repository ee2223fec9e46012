//! Flutter-facing bindings for the todos core.

pub mod api;
