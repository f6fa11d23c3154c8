use habitflow_core::db::open_db_in_memory;
use habitflow_core::{KeyValueStore, RepoError, SqliteKeyValueStore};

#[test]
fn get_missing_key_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    assert_eq!(kv.get("habitflow-simple").unwrap(), None);
}

#[test]
fn set_replaces_previous_value() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    kv.set("habitflow-simple", "{\"xp\":1}").unwrap();
    kv.set("habitflow-simple", "{\"xp\":2}").unwrap();

    assert_eq!(
        kv.get("habitflow-simple").unwrap().as_deref(),
        Some("{\"xp\":2}")
    );
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn remove_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    kv.set("k", "v").unwrap();
    kv.remove("k").unwrap();
    kv.remove("k").unwrap();

    assert_eq!(kv.get("k").unwrap(), None);
}

#[test]
fn blank_key_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    let err = kv.get(" ").unwrap_err();
    assert!(matches!(err, RepoError::InvalidKey(_)));
}
