//! Flutter-facing bindings for the birthday reminder core.

pub mod api;
