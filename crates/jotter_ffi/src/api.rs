//! FFI use-case API for the Flutter notes screen.
//!
//! # Responsibility
//! - Expose add/delete/list of notes to Dart via FRB.
//! - Own the process-wide controller that the screen talks to.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - `notes_add`/`notes_delete` only queue work; results become visible
//!   through `notes_snapshot` once `revision` changes.
//! - Every list item carries its note id so Dart list keys track identity.

use jotter_core::store::initialize;
use jotter_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, normalize_text,
    runtime, AppConfig, Note, NoteController,
};
use log::{info, warn};
use once_cell::sync::OnceCell;
use std::path::PathBuf;

static CONTROLLER: OnceCell<NoteController> = OnceCell::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Opens the note store and starts the controller.
///
/// `db_path = None` (or blank) uses the app's default location.
///
/// # FFI contract
/// - Sync call; opens the database file on first use.
/// - Idempotent for the same path; a different path is rejected.
/// - Never panics; returns empty string on success and error message on failure.
///   A failure here is fatal for the notes screen.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(db_path: Option<String>) -> String {
    match ensure_controller(db_path) {
        Ok(_) => String::new(),
        Err(err) => {
            warn!("event=ffi_init_store module=ffi status=error");
            err
        }
    }
}

/// Whether the add button should be enabled for `text`.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_can_add(text: String) -> bool {
    normalize_text(&text).is_ok()
}

/// One note row for the Dart list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    /// Stable note id, used as the list item key.
    pub id: i64,
    /// Trimmed note text.
    pub text: String,
    /// Creation time in epoch milliseconds.
    pub created: i64,
}

/// Current list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesSnapshotResponse {
    /// Notes, newest first.
    pub items: Vec<NoteItem>,
    /// Changes whenever the list changes; `0` before the first sync.
    pub revision: u64,
    /// Human-readable diagnostics message.
    pub message: String,
}

/// Generic action envelope for add/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesActionResponse {
    /// Whether the request was queued.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl NotesActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Queues a new note built from `text`.
///
/// # FFI contract
/// - Sync call, non-blocking: storage work happens on a background runtime.
/// - Blank text is rejected with `ok = false` and nothing is queued.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_add(text: String) -> NotesActionResponse {
    let controller = match controller() {
        Ok(controller) => controller,
        Err(err) => return NotesActionResponse::failure(format!("notes_add failed: {err}")),
    };

    if controller.add(&text) {
        NotesActionResponse::success("Note queued.")
    } else if !notes_can_add(text) {
        NotesActionResponse::failure("Note text is blank.")
    } else {
        NotesActionResponse::failure("notes_add failed: writer stopped")
    }
}

/// Queues deletion of note `id`.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Unknown ids are accepted and ignored by storage.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete(id: i64) -> NotesActionResponse {
    let controller = match controller() {
        Ok(controller) => controller,
        Err(err) => return NotesActionResponse::failure(format!("notes_delete failed: {err}")),
    };

    if controller.delete_id(id) {
        NotesActionResponse::success("Delete queued.")
    } else {
        NotesActionResponse::failure("notes_delete failed: writer stopped")
    }
}

/// Returns the controller's current note list.
///
/// # FFI contract
/// - Sync call, reads an in-memory snapshot only.
/// - Never panics; returns an empty envelope before `init_store`.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_snapshot() -> NotesSnapshotResponse {
    match controller() {
        Ok(controller) => {
            let snapshot = controller.current_notes();
            let items = snapshot.notes().iter().map(to_note_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No notes.".to_string()
            } else {
                format!("{} note(s).", items.len())
            };
            NotesSnapshotResponse {
                items,
                revision: snapshot.revision,
                message,
            }
        }
        Err(err) => NotesSnapshotResponse {
            items: Vec::new(),
            revision: 0,
            message: format!("notes_snapshot failed: {err}"),
        },
    }
}

fn ensure_controller(db_path: Option<String>) -> Result<&'static NoteController, String> {
    let path = db_path
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| AppConfig::resolve().db_path);

    let store = initialize(&path).map_err(|err| format!("store init failed: {err}"))?;
    CONTROLLER.get_or_try_init(|| -> Result<NoteController, String> {
        let handle = runtime::handle().map_err(|err| format!("runtime init failed: {err}"))?;
        info!("event=ffi_init_store module=ffi status=ok");
        Ok(NoteController::new(store, &handle))
    })
}

fn controller() -> Result<&'static NoteController, String> {
    CONTROLLER
        .get()
        .ok_or_else(|| "store not initialized; call init_store first".to_string())
}

fn to_note_item(note: &Note) -> NoteItem {
    NoteItem {
        id: note.id,
        text: note.text.clone(),
        created: note.created,
    }
}
