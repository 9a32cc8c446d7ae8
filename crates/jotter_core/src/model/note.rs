//! Note domain model.
//!
//! # Responsibility
//! - Define the single persisted record shape.
//! - Own the text normalization rule shared by store, controller and UI.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused for another note.
//! - `text` is trimmed and never blank for a persisted note.
//! - `created` is set once at insert time and never changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage-assigned note identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = i64;

/// Canonical persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    /// Auto-increment id from the `notes` table.
    pub id: NoteId,
    /// Trimmed, non-blank body text.
    pub text: String,
    /// Unix epoch milliseconds at insert time.
    pub created: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NoteValidationError {
    #[error("note text cannot be blank")]
    BlankText,
    #[error("note text has surrounding whitespace")]
    UntrimmedText,
}

impl Note {
    /// Checks the invariants a persisted note must satisfy.
    ///
    /// Used on read paths so corrupted rows are reported instead of masked.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return Err(NoteValidationError::BlankText);
        }
        if trimmed.len() != self.text.len() {
            return Err(NoteValidationError::UntrimmedText);
        }
        Ok(())
    }
}

/// Trims surrounding whitespace and rejects blank input.
pub fn normalize_text(raw: &str) -> Result<String, NoteValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NoteValidationError::BlankText);
    }
    Ok(trimmed.to_string())
}

/// Returns whether `raw` would be accepted as note text.
pub fn is_submittable(raw: &str) -> bool {
    !raw.trim().is_empty()
}
