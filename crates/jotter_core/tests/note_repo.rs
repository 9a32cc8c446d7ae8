use jotter_core::db::open_db_in_memory;
use jotter_core::{NoteRepository, NoteValidationError, RepoError, SqliteNoteRepository};
use rusqlite::Connection;

#[test]
fn insert_assigns_fresh_ids_and_get_reads_back() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let first = repo.insert_note("first", 1_000).unwrap();
    let second = repo.insert_note("second", 2_000).unwrap();
    assert_ne!(first.id, second.id);

    let loaded = repo.get_note(second.id).unwrap().unwrap();
    assert_eq!(loaded, second);
    assert!(repo.get_note(second.id + 100).unwrap().is_none());
}

#[test]
fn insert_rejects_blank_and_untrimmed_text() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let err = repo.insert_note("  ", 1_000).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(NoteValidationError::BlankText)
    ));
    let err = repo.insert_note(" padded ", 1_000).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(NoteValidationError::UntrimmedText)
    ));
    assert!(repo.list_notes().unwrap().is_empty());
}

#[test]
fn list_orders_by_created_desc_then_id_desc() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let old = repo.insert_note("old", 1_000).unwrap();
    let tie_first = repo.insert_note("tie first", 5_000).unwrap();
    let tie_second = repo.insert_note("tie second", 5_000).unwrap();
    let middle = repo.insert_note("middle", 3_000).unwrap();

    let ids: Vec<i64> = repo.list_notes().unwrap().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![tie_second.id, tie_first.id, middle.id, old.id]);

    let listed = repo.list_notes().unwrap();
    for pair in listed.windows(2) {
        assert!(pair[0].created >= pair[1].created);
    }
}

#[test]
fn delete_reports_whether_a_row_was_removed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let note = repo.insert_note("short-lived", 1_000).unwrap();

    assert!(repo.delete_note(note.id).unwrap());
    assert!(!repo.delete_note(note.id).unwrap());
    assert!(!repo.delete_note(999).unwrap());
}

#[test]
fn ids_are_not_reused_after_deleting_the_highest() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let first = repo.insert_note("a", 1_000).unwrap();
    let second = repo.insert_note("b", 2_000).unwrap();
    repo.delete_note(second.id).unwrap();
    let third = repo.insert_note("c", 3_000).unwrap();

    assert!(third.id > second.id);
    assert!(second.id > first.id);
}

#[test]
fn try_new_rejects_connection_without_notes_table() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteNoteRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
}

#[test]
fn list_rejects_corrupted_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO notes (text, created) VALUES (' padded', 1000);",
        [],
    )
    .unwrap();

    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let err = repo.list_notes().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert!(err.to_string().contains("surrounding whitespace"), "{err}");
}
