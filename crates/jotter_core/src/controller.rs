//! Note list controller (view model).
//!
//! # Responsibility
//! - Turn UI intents into queued store writes without blocking the caller.
//! - Mirror the store's live query into an observable `current_notes` value.
//!
//! # Invariants
//! - Writes are applied in the order they were issued.
//! - `current_notes` starts empty (revision 0) and afterwards only changes
//!   when the store publishes a snapshot.
//! - Dropping the controller ends the observing scope and releases the store
//!   subscription; already queued writes still complete.

use crate::model::note::{normalize_text, Note, NoteId};
use crate::observable::{Observable, Observer};
use crate::store::{NoteStore, NoteSubscription, NotesSnapshot, StoreResult};
use log::{debug, error, warn};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

#[derive(Debug)]
enum Command {
    Add(String),
    Delete(NoteId),
}

impl Command {
    fn label(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Delete(_) => "delete",
        }
    }

    fn apply(self, store: &NoteStore) -> StoreResult<()> {
        match self {
            Self::Add(text) => store.insert(&text).map(|_| ()),
            Self::Delete(id) => store.delete(id).map(|_| ()),
        }
    }
}

/// Bridges UI events to the store and exposes the current note list.
pub struct NoteController {
    commands: mpsc::UnboundedSender<Command>,
    notes: Arc<Observable<NotesSnapshot>>,
    observer_task: JoinHandle<()>,
    writer_task: Option<JoinHandle<()>>,
}

impl NoteController {
    /// Starts the writer and observer tasks on `runtime`.
    pub fn new(store: Arc<NoteStore>, runtime: &Handle) -> Self {
        let notes = Arc::new(Observable::new(NotesSnapshot::default()));
        let (commands, queue) = mpsc::unbounded_channel();

        let writer_task = runtime.spawn(run_writer(Arc::clone(&store), queue));
        let observer_task = runtime.spawn(run_observer(store.query_all(), Arc::clone(&notes)));

        Self {
            commands,
            notes,
            observer_task,
            writer_task: Some(writer_task),
        }
    }

    /// Queues an insert of the trimmed `raw_text`.
    ///
    /// Returns `false` without queuing anything when the text is blank.
    pub fn add(&self, raw_text: &str) -> bool {
        let Ok(text) = normalize_text(raw_text) else {
            debug!("event=note_add module=controller status=skipped reason=blank_text");
            return false;
        };
        self.enqueue(Command::Add(text))
    }

    /// Queues removal of `note`.
    pub fn delete(&self, note: &Note) -> bool {
        self.delete_id(note.id)
    }

    /// Queues removal of the note with `id`.
    pub fn delete_id(&self, id: NoteId) -> bool {
        self.enqueue(Command::Delete(id))
    }

    /// Latest snapshot seen from the store.
    pub fn current_notes(&self) -> NotesSnapshot {
        self.notes.get()
    }

    /// Receiver over `current_notes` for async consumers.
    pub fn watch(&self) -> watch::Receiver<NotesSnapshot> {
        self.notes.watch()
    }

    /// Registers `callback` for every later change of `current_notes`.
    ///
    /// Callbacks run on a background worker thread.
    #[must_use = "the callback is unregistered when the observer is dropped"]
    pub fn on_change(
        &self,
        callback: impl Fn(&NotesSnapshot) + Send + Sync + 'static,
    ) -> Observer<NotesSnapshot> {
        self.notes.observe(callback)
    }

    /// Ends the observing scope and resolves once every queued write has
    /// been applied.
    pub async fn shutdown(mut self) {
        let writer_task = self.writer_task.take();
        drop(self);
        if let Some(writer_task) = writer_task {
            if let Err(err) = writer_task.await {
                warn!("event=writer_stop module=controller status=error error={err}");
            }
        }
    }

    fn enqueue(&self, command: Command) -> bool {
        let label = command.label();
        match self.commands.send(command) {
            Ok(()) => true,
            Err(_) => {
                warn!("event=note_{label} module=controller status=error error_code=writer_closed");
                false
            }
        }
    }
}

impl Drop for NoteController {
    fn drop(&mut self) {
        self.observer_task.abort();
    }
}

async fn run_writer(store: Arc<NoteStore>, mut queue: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = queue.recv().await {
        let label = command.label();
        let store = Arc::clone(&store);
        match tokio::task::spawn_blocking(move || command.apply(&store)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!("event=note_write module=controller status=error op={label} error={err}");
            }
            Err(err) => {
                error!("event=note_write module=controller status=error op={label} error_code=task_failed error={err}");
            }
        }
    }
    debug!("event=writer_stop module=controller status=ok");
}

async fn run_observer(mut subscription: NoteSubscription, notes: Arc<Observable<NotesSnapshot>>) {
    while let Some(snapshot) = subscription.next().await {
        notes.set(snapshot);
    }
}
