//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/delete/list APIs over the `notes` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths reject blank text before any SQL mutation.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Listing is always ordered by `created DESC, id DESC`.

use crate::db::DbError;
use crate::model::note::{Note, NoteId, NoteValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

const NOTE_SELECT_SQL: &str = "SELECT id, text, created FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    Validation(#[from] NoteValidationError),
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("invalid persisted note data: {0}")]
    InvalidData(String),
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for note operations.
pub trait NoteRepository {
    /// Persists one note and returns it with its assigned id.
    fn insert_note(&self, text: &str, created: i64) -> RepoResult<Note>;
    /// Removes one note. Returns `false` when no row matched.
    fn delete_note(&self, id: NoteId) -> RepoResult<bool>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists every note, newest first.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Wraps a connection that is already known to be migrated.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Constructs a repository after verifying the `notes` schema shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, text: &str, created: i64) -> RepoResult<Note> {
        let candidate = Note {
            id: 0,
            text: text.to_string(),
            created,
        };
        candidate.validate()?;

        self.conn.execute(
            "INSERT INTO notes (text, created) VALUES (?1, ?2);",
            params![candidate.text.as_str(), candidate.created],
        )?;

        Ok(Note {
            id: self.conn.last_insert_rowid(),
            ..candidate
        })
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt.query_row([id], read_note_row).optional()?;
        row.map(check_note).transpose()
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY created DESC, id DESC;"))?;
        let rows = stmt.query_map([], read_note_row)?;
        rows.map(|row| check_note(row?)).collect()
    }
}

fn read_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        text: row.get("text")?,
        created: row.get("created")?,
    })
}

fn check_note(note: Note) -> RepoResult<Note> {
    note.validate()
        .map_err(|err| RepoError::InvalidData(format!("notes.id={}: {err}", note.id)))?;
    Ok(note)
}

const REQUIRED_COLUMNS: [&str; 3] = ["id", "text", "created"];

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    // table_info yields no rows for a missing table.
    let columns = conn
        .prepare("PRAGMA table_info(notes);")?
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    match REQUIRED_COLUMNS
        .into_iter()
        .find(|required| !columns.iter().any(|column| column == required))
    {
        Some(column) => Err(RepoError::MissingRequiredColumn {
            table: "notes",
            column,
        }),
        None => Ok(()),
    }
}
