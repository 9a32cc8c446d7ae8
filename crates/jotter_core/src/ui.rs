//! Single-screen presentation model.
//!
//! Holds only transient input state. Everything shown comes from the
//! controller's current snapshot; rows are identified by note id so removals
//! and re-sorting never retarget an action at the wrong note.

use crate::controller::NoteController;
use crate::model::note::{is_submittable, NoteId};
use crate::store::NotesSnapshot;
use std::fmt::Write as _;

pub const INPUT_PLACEHOLDER: &str = "New note";
pub const ADD_LABEL: &str = "Add";

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    /// Stable row identity (the note id).
    pub key: NoteId,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct NoteScreen {
    input: String,
}

impl NoteScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Add is enabled only for non-blank input.
    pub fn can_add(&self) -> bool {
        is_submittable(&self.input)
    }

    /// Issues an add for the current input and clears it.
    ///
    /// The input is cleared as soon as the request is issued, not when it is
    /// persisted. Returns `false` (input untouched) when add is disabled.
    pub fn submit(&mut self, controller: &NoteController) -> bool {
        if !self.can_add() {
            return false;
        }
        let issued = controller.add(&self.input);
        if issued {
            self.input.clear();
        }
        issued
    }

    /// Rows in display order, keyed by note id.
    pub fn rows(&self, snapshot: &NotesSnapshot) -> Vec<NoteRow> {
        snapshot
            .notes()
            .iter()
            .map(|note| NoteRow {
                key: note.id,
                text: note.text.clone(),
            })
            .collect()
    }

    /// Deletes the note behind row `key`; unknown keys are ignored.
    pub fn delete_row(
        &self,
        controller: &NoteController,
        snapshot: &NotesSnapshot,
        key: NoteId,
    ) -> bool {
        match snapshot.find(key) {
            Some(note) => controller.delete(note),
            None => false,
        }
    }

    /// Plain-text rendering of the whole screen.
    pub fn render(&self, snapshot: &NotesSnapshot) -> String {
        let mut out = String::new();
        let input_line = if self.input.is_empty() {
            format!("({INPUT_PLACEHOLDER})")
        } else {
            self.input.clone()
        };
        let add_state = if self.can_add() { "" } else { " disabled" };
        let _ = writeln!(out, "> {input_line}  [{ADD_LABEL}{add_state}]");

        if snapshot.is_empty() {
            let _ = writeln!(out, "  no notes yet");
        }
        for (position, row) in self.rows(snapshot).iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {}  [x]", position + 1, row.text);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::NoteScreen;
    use crate::model::note::Note;
    use crate::store::NotesSnapshot;
    use std::sync::Arc;

    fn snapshot(notes: &[(i64, &str, i64)]) -> NotesSnapshot {
        NotesSnapshot {
            revision: 3,
            notes: Arc::new(
                notes
                    .iter()
                    .map(|(id, text, created)| Note {
                        id: *id,
                        text: (*text).to_string(),
                        created: *created,
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn add_is_enabled_only_for_non_blank_input() {
        let mut screen = NoteScreen::new();
        assert!(!screen.can_add());
        screen.set_input("   ");
        assert!(!screen.can_add());
        screen.set_input(" milk ");
        assert!(screen.can_add());
    }

    #[test]
    fn rows_are_keyed_by_note_id_not_position() {
        let screen = NoteScreen::new();
        let rows = screen.rows(&snapshot(&[(9, "c", 30), (4, "a", 10)]));
        assert_eq!(rows.iter().map(|row| row.key).collect::<Vec<_>>(), vec![9, 4]);
        assert_eq!(rows[1].text, "a");
    }

    #[test]
    fn render_shows_placeholder_disabled_add_and_rows() {
        let mut screen = NoteScreen::new();
        let rendered = screen.render(&snapshot(&[(2, "b", 20), (1, "a", 10)]));
        assert!(rendered.contains("(New note)"));
        assert!(rendered.contains("[Add disabled]"));
        assert!(rendered.contains("  1. b"));
        assert!(rendered.contains("  2. a"));

        screen.set_input("draft");
        let rendered = screen.render(&NotesSnapshot::default());
        assert!(rendered.contains("> draft  [Add]"));
        assert!(rendered.contains("no notes yet"));
    }
}
