//! Immutable list snapshots published by the live query.

use crate::model::note::{Note, NoteId};
use std::sync::Arc;

/// One complete, ordered view of the `notes` table.
///
/// Snapshots are shared behind an `Arc` and never mutated after publication,
/// so a reader always sees the state after one whole committed write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesSnapshot {
    /// `0` for the pre-sync empty state, then one per store emission.
    pub revision: u64,
    /// Notes ordered by `created DESC, id DESC`.
    pub notes: Arc<Vec<Note>>,
}

impl NotesSnapshot {
    pub(crate) fn new(revision: u64, notes: Vec<Note>) -> Self {
        Self {
            revision,
            notes: Arc::new(notes),
        }
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.as_slice()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Ids in display order.
    pub fn ids(&self) -> Vec<NoteId> {
        self.notes.iter().map(|note| note.id).collect()
    }

    /// Texts in display order.
    pub fn texts(&self) -> Vec<&str> {
        self.notes.iter().map(|note| note.text.as_str()).collect()
    }

    pub fn find(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }
}
