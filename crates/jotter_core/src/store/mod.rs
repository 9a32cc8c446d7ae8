//! Durable note storage with a push-updating live query.
//!
//! # Responsibility
//! - Own the single SQLite connection for the notes table.
//! - Serialize writes and publish a fresh ordered snapshot after each commit.
//! - Hand out live subscriptions (`query_all`).
//!
//! # Invariants
//! - Every mutation and the snapshot it produces happen under one lock, so
//!   subscribers never observe a partially-applied write.
//! - `created` is the wall clock at insert; ordering ties break on `id`.
//! - A committed write is reported as committed even if refreshing the
//!   snapshot afterwards fails.
//! - Blank inserts and deletes of unknown ids are silent no-ops.

mod global;
mod snapshot;
mod subscription;

pub use global::{global, initialize};
pub use snapshot::NotesSnapshot;
pub use subscription::NoteSubscription;

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::note::{normalize_text, Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoError, SqliteNoteRepository};
use log::{debug, error, info};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::watch;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("{0}")]
    Repo(#[from] RepoError),
    #[error("note store already initialized at `{active}`; refusing to switch to `{requested}`")]
    AlreadyInitialized { active: String, requested: String },
}

struct WriterState {
    conn: Connection,
    revision: u64,
}

/// SQLite-backed note store.
pub struct NoteStore {
    path: Option<PathBuf>,
    state: Mutex<WriterState>,
    snapshots: watch::Sender<NotesSnapshot>,
}

impl std::fmt::Debug for NoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStore")
            .field("path", &self.path)
            .field("revision", &self.snapshots.borrow().revision)
            .finish_non_exhaustive()
    }
}

impl NoteStore {
    /// Opens or creates the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_db(&path)?;
        Self::from_connection(conn, Some(path))
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_db_in_memory()?;
        Self::from_connection(conn, None)
    }

    fn from_connection(conn: Connection, path: Option<PathBuf>) -> StoreResult<Self> {
        let notes = SqliteNoteRepository::try_new(&conn)?.list_notes()?;
        info!(
            "event=store_open module=store status=ok mode={} note_count={}",
            if path.is_some() { "file" } else { "memory" },
            notes.len()
        );

        let (snapshots, _) = watch::channel(NotesSnapshot::new(1, notes));
        Ok(Self {
            path,
            state: Mutex::new(WriterState { conn, revision: 1 }),
            snapshots,
        })
    }

    /// Backing file location, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Persists a new note from `text`.
    ///
    /// Returns `Ok(None)` without touching storage when `text` is blank after
    /// trimming.
    pub fn insert(&self, text: &str) -> StoreResult<Option<Note>> {
        let Ok(text) = normalize_text(text) else {
            debug!("event=note_insert module=store status=skipped reason=blank_text");
            return Ok(None);
        };

        let mut state = self.state.lock();
        let note = SqliteNoteRepository::new(&state.conn).insert_note(&text, now_millis())?;
        self.publish(&mut state, "note_insert");

        info!(
            "event=note_insert module=store status=ok note_id={} created={} revision={}",
            note.id, note.created, state.revision
        );
        Ok(Some(note))
    }

    /// Permanently removes the note with `id`.
    ///
    /// Returns `Ok(false)` when no such note exists; nothing is published in
    /// that case.
    pub fn delete(&self, id: NoteId) -> StoreResult<bool> {
        let mut state = self.state.lock();
        let removed = SqliteNoteRepository::new(&state.conn).delete_note(id)?;
        if !removed {
            debug!("event=note_delete module=store status=skipped reason=not_found note_id={id}");
            return Ok(false);
        }

        self.publish(&mut state, "note_delete");
        info!(
            "event=note_delete module=store status=ok note_id={} revision={}",
            id, state.revision
        );
        Ok(true)
    }

    /// Subscribes to the live "all notes, newest first" query.
    pub fn query_all(&self) -> NoteSubscription {
        NoteSubscription::new(self.snapshots.subscribe())
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> NotesSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Number of live subscriptions currently attached.
    pub fn subscriber_count(&self) -> usize {
        self.snapshots.receiver_count()
    }

    // The write is already committed here, so a failed re-read is logged
    // and the previous snapshot stays current.
    fn publish(&self, state: &mut WriterState, event: &str) {
        match SqliteNoteRepository::new(&state.conn).list_notes() {
            Ok(notes) => {
                state.revision += 1;
                self.snapshots
                    .send_replace(NotesSnapshot::new(state.revision, notes));
            }
            Err(err) => error!(
                "event={event} module=store status=error error_code=publish_failed revision={} error={err}",
                state.revision
            ),
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::{now_millis, NoteStore};

    #[test]
    fn insert_stamps_current_time() {
        let store = NoteStore::open_in_memory().unwrap();
        let before = now_millis();
        let note = store.insert("stamped").unwrap().unwrap();
        let after = now_millis();
        assert!((before..=after).contains(&note.created));
    }

    #[test]
    fn open_in_memory_starts_empty_at_revision_one() {
        let store = NoteStore::open_in_memory().unwrap();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.revision, 1);
        assert!(snapshot.is_empty());
        assert!(store.path().is_none());
    }

    #[test]
    fn blank_insert_does_not_publish() {
        let store = NoteStore::open_in_memory().unwrap();
        assert!(store.insert("  \t ").unwrap().is_none());
        assert_eq!(store.snapshot().revision, 1);
    }

    #[test]
    fn subscriber_count_tracks_dropped_subscriptions() {
        let store = NoteStore::open_in_memory().unwrap();
        let first = store.query_all();
        let second = store.query_all();
        assert_eq!(store.subscriber_count(), 2);
        drop(first);
        assert_eq!(store.subscriber_count(), 1);
        drop(second);
        assert_eq!(store.subscriber_count(), 0);
    }
}
