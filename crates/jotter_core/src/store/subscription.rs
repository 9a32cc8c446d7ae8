//! Live query subscription over store snapshots.
//!
//! # Invariants
//! - The first item of a fresh subscription is the then-current snapshot.
//! - Later items are produced only after a committed change.
//! - A lagging subscriber skips straight to the newest snapshot.

use super::snapshot::NotesSnapshot;
use tokio::sync::watch;

/// Continuously-updating sequence of "all notes, newest first".
///
/// Dropping the subscription releases its receiver slot in the store.
#[derive(Debug)]
pub struct NoteSubscription {
    rx: watch::Receiver<NotesSnapshot>,
    primed: bool,
}

impl NoteSubscription {
    pub(crate) fn new(rx: watch::Receiver<NotesSnapshot>) -> Self {
        Self { rx, primed: false }
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn next(&mut self) -> Option<NotesSnapshot> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }

        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Latest snapshot without consuming a change notification.
    pub fn current(&self) -> NotesSnapshot {
        self.rx.borrow().clone()
    }
}
