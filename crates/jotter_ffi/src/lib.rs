//! Flutter-facing bindings for the Jotter core.

pub mod api;
