use rusqlite::Connection;
use unihub_core::db::migrations::latest_version;
use unihub_core::db::{open_db, open_db_in_memory, DbError};
use unihub_core::{KeyValueStore, SqliteKeyValueStore};

#[test]
fn fresh_database_has_kv_table_at_latest_version() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn), latest_version());
    assert!(has_table(&conn, "kv_entries"));
}

#[test]
fn reopening_file_keeps_schema_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unihub.sqlite3");

    let store = SqliteKeyValueStore::open(&path).unwrap();
    store.set_raw("notices", r#"[{"title":"Orientation"}]"#).unwrap();
    drop(store);

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), latest_version());
    let store = SqliteKeyValueStore::from_connection(conn);
    assert_eq!(
        store.get_raw("notices").unwrap().as_deref(),
        Some(r#"[{"title":"Orientation"}]"#)
    );
}

#[test]
fn database_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 42;")
        .unwrap();

    let Err(err) = SqliteKeyValueStore::open(&path) else {
        panic!("newer schema should not open");
    };
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion {
            db_version: 42,
            latest_supported,
        } if latest_supported == latest_version()
    ));
}

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn has_table(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [name],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}
