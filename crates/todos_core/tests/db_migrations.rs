use rusqlite::Connection;
use todos_core::db::migrations::{apply_migrations, current_user_version, latest_version};
use todos_core::db::open_db_in_memory;
use todos_core::StorageError;

#[test]
fn open_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());

    let columns: Vec<String> = conn
        .prepare("PRAGMA table_info(kv_entries);")
        .unwrap()
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(columns, vec!["key", "value", "updated_at"]);
}

#[test]
fn applying_twice_is_a_no_op() {
    let mut conn = Connection::open_in_memory().unwrap();
    assert_eq!(apply_migrations(&mut conn).unwrap(), latest_version());
    assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
}

#[test]
fn newer_schema_is_refused_without_touching_it() {
    let mut conn = open_db_in_memory().unwrap();
    let future = latest_version() + 3;
    conn.pragma_update(None, "user_version", future).unwrap();

    match apply_migrations(&mut conn) {
        Err(StorageError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, future);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(current_user_version(&conn).unwrap(), future);
}

#[test]
fn sqlite_failures_are_not_double_wrapped() {
    let conn = Connection::open_in_memory().unwrap();
    let err = conn.execute_batch("NOT SQL;").unwrap_err();
    assert!(matches!(StorageError::from(err), StorageError::Sqlite(_)));
}
