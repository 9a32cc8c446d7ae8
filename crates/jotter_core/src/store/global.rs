//! Process-wide store handle.
//!
//! # Invariants
//! - At most one `NoteStore` is opened per process.
//! - Concurrent first-time callers block on the same initializer; schema
//!   creation runs once.
//! - Re-initialization with a different path is rejected.

use super::{NoteStore, StoreError, StoreResult};
use log::info;
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;

static STORE: OnceCell<Arc<NoteStore>> = OnceCell::new();

/// Opens the process-wide store at `path`, or returns the existing handle.
///
/// # Errors
/// - Returns open/migration errors from the first initialization attempt.
/// - Returns `StoreError::AlreadyInitialized` when a store is already open at
///   another path.
pub fn initialize(path: impl AsRef<Path>) -> StoreResult<Arc<NoteStore>> {
    let requested = path.as_ref();
    let store = STORE.get_or_try_init(|| -> StoreResult<Arc<NoteStore>> {
        let store = NoteStore::open(requested)?;
        info!(
            "event=store_init module=store status=ok path={}",
            requested.display()
        );
        Ok(Arc::new(store))
    })?;

    match store.path() {
        Some(active) if active == requested => Ok(Arc::clone(store)),
        active => Err(StoreError::AlreadyInitialized {
            active: active
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| ":memory:".to_string()),
            requested: requested.display().to_string(),
        }),
    }
}

/// Returns the process-wide store if it has been initialized.
pub fn global() -> Option<Arc<NoteStore>> {
    STORE.get().cloned()
}
