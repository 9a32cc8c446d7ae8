//! Domain model for the notes list.
//!
//! # Invariants
//! - A note is only created by insert and only destroyed by delete; it is
//!   never updated in place.

pub mod note;
