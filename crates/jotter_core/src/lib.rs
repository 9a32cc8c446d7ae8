//! Core domain logic for Jotter.
//! This crate is the single source of truth for note invariants.

pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod observable;
pub mod repo;
pub mod runtime;
pub mod store;
pub mod ui;

pub use config::AppConfig;
pub use controller::NoteController;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{normalize_text, Note, NoteId, NoteValidationError};
pub use observable::{Observable, Observer};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use store::{NoteStore, NoteSubscription, NotesSnapshot, StoreError, StoreResult};
pub use ui::{NoteRow, NoteScreen};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
