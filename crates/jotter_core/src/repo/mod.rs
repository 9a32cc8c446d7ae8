//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for notes.
//! - Isolate SQLite query details from the store and controller.
//!
//! # Invariants
//! - Repository writes must enforce `Note::validate()` before persistence.

pub mod note_repo;
