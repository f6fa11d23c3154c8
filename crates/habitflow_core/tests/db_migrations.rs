use habitflow_core::db::migrations::latest_version;
use habitflow_core::db::{open_db, open_db_in_memory, DbError};
use habitflow_core::{KeyValueStore, SqliteKeyValueStore};
use rusqlite::Connection;

fn user_version(conn: &Connection) -> u32 {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap()
}

fn kv_columns(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(kv_store);").unwrap();
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    columns
}

#[test]
fn fresh_memory_database_is_at_latest_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(kv_columns(&conn), vec!["key", "value", "updated_at"]);
}

#[test]
fn reopening_a_file_keeps_stored_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habitflow.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        SqliteKeyValueStore::new(&conn)
            .set("habitflow-simple", r#"{"xp":40}"#)
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(
        SqliteKeyValueStore::new(&conn)
            .get("habitflow-simple")
            .unwrap()
            .as_deref(),
        Some(r#"{"xp":40}"#)
    );
}

#[test]
fn database_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    Connection::open(&path)
        .unwrap()
        .pragma_update(None, "user_version", 42)
        .unwrap();

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion { found, supported } => {
            assert_eq!(found, 42);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}
