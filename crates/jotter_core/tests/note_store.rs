use jotter_core::{NoteStore, NotesSnapshot};
use rusqlite::Connection;
use std::time::Duration;

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn texts(snapshot: &NotesSnapshot) -> Vec<String> {
    snapshot.notes().iter().map(|note| note.text.clone()).collect()
}

#[test]
fn insert_then_list_contains_exactly_the_new_note() {
    let store = NoteStore::open_in_memory().unwrap();

    let note = store.insert("Buy milk").unwrap().expect("note should persist");
    let snapshot = store.snapshot();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.notes()[0], note);
    assert_eq!(note.text, "Buy milk");
}

#[test]
fn insert_trims_surrounding_whitespace() {
    let store = NoteStore::open_in_memory().unwrap();
    let note = store.insert("   hello   ").unwrap().unwrap();
    assert_eq!(note.text, "hello");
    assert_eq!(texts(&store.snapshot()), vec!["hello"]);
}

#[test]
fn blank_inserts_never_change_the_snapshot() {
    let store = NoteStore::open_in_memory().unwrap();
    store.insert("existing").unwrap();
    let before = store.snapshot();

    assert!(store.insert("").unwrap().is_none());
    assert!(store.insert("   ").unwrap().is_none());

    assert_eq!(store.snapshot(), before);
}

#[test]
fn delete_removes_exactly_one_note() {
    let store = NoteStore::open_in_memory().unwrap();
    let one = store.insert("one").unwrap().unwrap();
    let two = store.insert("two").unwrap().unwrap();
    let three = store.insert("three").unwrap().unwrap();

    assert!(store.delete(two.id).unwrap());

    let mut ids = store.snapshot().ids();
    ids.sort_unstable();
    assert_eq!(ids, vec![one.id, three.id]);
}

#[test]
fn delete_of_unknown_id_is_a_silent_no_op() {
    let store = NoteStore::open_in_memory().unwrap();
    store.insert("keep me").unwrap();
    let before = store.snapshot();

    assert!(!store.delete(999).unwrap());
    assert_eq!(store.snapshot(), before);
}

#[test]
fn snapshots_are_newest_first_with_non_increasing_created() {
    let store = NoteStore::open_in_memory().unwrap();
    for text in ["a", "b", "c"] {
        store.insert(text).unwrap();
        std::thread::sleep(Duration::from_millis(2));
    }

    let snapshot = store.snapshot();
    assert_eq!(texts(&snapshot), vec!["c", "b", "a"]);
    for pair in snapshot.notes().windows(2) {
        assert!(pair[0].created >= pair[1].created);
    }

    let b_id = snapshot.notes()[1].id;
    store.delete(b_id).unwrap();
    assert_eq!(texts(&store.snapshot()), vec!["c", "a"]);
}

#[test]
fn rapid_inserts_keep_insertion_order_within_the_same_millisecond() {
    let store = NoteStore::open_in_memory().unwrap();
    for idx in 0..20 {
        store.insert(&format!("note {idx}")).unwrap();
    }

    let expected: Vec<String> = (0..20).rev().map(|idx| format!("note {idx}")).collect();
    assert_eq!(texts(&store.snapshot()), expected);
}

#[test]
fn reopening_a_file_store_keeps_notes_and_revision_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    {
        let store = NoteStore::open(&path).unwrap();
        store.insert("persisted").unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
    }

    let reopened = NoteStore::open(&path).unwrap();
    let snapshot = reopened.snapshot();
    assert_eq!(snapshot.revision, 1);
    assert_eq!(texts(&snapshot), vec!["persisted"]);
}

#[test]
fn future_created_on_disk_does_not_shift_new_notes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let day_ms = 24 * 60 * 60 * 1000;
    let future = now_millis() + day_ms;

    {
        let conn = jotter_core::db::open_db(&path).unwrap();
        conn.execute(
            "INSERT INTO notes (text, created) VALUES ('from the future', ?1);",
            [future],
        )
        .unwrap();
    }

    let store = NoteStore::open(&path).unwrap();
    let before = now_millis();
    let a = store.insert("a").unwrap().unwrap();
    let b = store.insert("b").unwrap().unwrap();
    let after = now_millis();

    for note in [&a, &b] {
        assert!((before..=after).contains(&note.created), "{}", note.created);
    }
    assert_eq!(texts(&store.snapshot()), vec!["from the future", "b", "a"]);
}

#[test]
fn insert_reports_commit_when_snapshot_refresh_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let store = NoteStore::open(&path).unwrap();
    let before = store.snapshot();

    // A second connection writes a row the store refuses to read back.
    let other = Connection::open(&path).unwrap();
    other
        .execute(
            "INSERT INTO notes (text, created) VALUES (' padded', 0);",
            [],
        )
        .unwrap();

    let note = store
        .insert("committed")
        .expect("a committed insert must not be reported as failed")
        .unwrap();
    assert_eq!(store.snapshot(), before);

    let stored: String = other
        .query_row("SELECT text FROM notes WHERE id = ?1;", [note.id], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(stored, "committed");

    assert!(store.delete(note.id).expect("committed delete is reported as such"));
    assert_eq!(store.snapshot(), before);
}

#[tokio::test]
async fn new_subscription_first_yields_current_snapshot() {
    let store = NoteStore::open_in_memory().unwrap();
    store.insert("before subscribe").unwrap();

    let mut subscription = store.query_all();
    let first = subscription.next().await.unwrap();
    assert_eq!(texts(&first), vec!["before subscribe"]);
    assert_eq!(first.revision, store.snapshot().revision);
}

#[tokio::test]
async fn subscription_emits_after_each_committed_write() {
    let store = NoteStore::open_in_memory().unwrap();
    let mut subscription = store.query_all();
    let initial = subscription.next().await.unwrap();
    assert!(initial.is_empty());

    let note = store.insert("Buy milk").unwrap().unwrap();
    let after_insert = tokio::time::timeout(Duration::from_secs(5), subscription.next())
        .await
        .expect("insert should emit")
        .unwrap();
    assert_eq!(after_insert.ids(), vec![note.id]);
    assert!(after_insert.revision > initial.revision);

    store.delete(note.id).unwrap();
    let after_delete = tokio::time::timeout(Duration::from_secs(5), subscription.next())
        .await
        .expect("delete should emit")
        .unwrap();
    assert!(after_delete.is_empty());
}

#[tokio::test]
async fn lagging_subscriber_receives_latest_complete_snapshot() {
    let store = NoteStore::open_in_memory().unwrap();
    let mut subscription = store.query_all();
    subscription.next().await.unwrap();

    for text in ["x", "y", "z"] {
        store.insert(text).unwrap();
    }

    let latest = subscription.next().await.unwrap();
    assert_eq!(texts(&latest), vec!["z", "y", "x"]);
    assert_eq!(latest, subscription.current());
}

#[tokio::test]
async fn subscription_ends_when_store_is_dropped() {
    let store = NoteStore::open_in_memory().unwrap();
    let mut subscription = store.query_all();
    subscription.next().await.unwrap();

    drop(store);
    assert!(subscription.next().await.is_none());
}
