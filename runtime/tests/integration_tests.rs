//! Integration tests for the dalgen-runtime crate.

use dalgen_runtime::{DbContext, Error, FromRow};
use rusqlite::{Connection, Row, params};

#[derive(Debug, PartialEq)]
struct Problem {
    contest_id: i64,
    id: i64,
    name: String,
}

impl FromRow for Problem {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            contest_id: row.get("contest_id")?,
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE problems (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            contest_id INTEGER NOT NULL,
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn
}

#[test]
fn test_exec_reports_rows_and_insert_id() {
    let conn = setup();
    let first = conn
        .exec(
            "INSERT INTO problems(contest_id, name) VALUES (?, ?)",
            params![1, "A"],
        )
        .unwrap();
    let second = conn
        .exec(
            "INSERT INTO problems(contest_id, name) VALUES (?, ?)",
            params![1, "B"],
        )
        .unwrap();

    assert_eq!(first.rows_affected, 1);
    assert_eq!(first.last_insert_id, 1);
    assert_eq!(second.last_insert_id, 2);

    let updated = conn
        .exec("UPDATE problems SET name = ? WHERE contest_id = ?", params!["X", 1])
        .unwrap();
    assert_eq!(updated.rows_affected, 2);
}

#[test]
fn test_get_maps_row_by_column_name() {
    let conn = setup();
    conn.exec(
        "INSERT INTO problems(contest_id, name) VALUES (?, ?)",
        params![7, "Sum"],
    )
    .unwrap();

    let problem: Problem = conn
        .get("SELECT * FROM problems WHERE id = ?", params![1])
        .unwrap();
    assert_eq!(
        problem,
        Problem {
            contest_id: 7,
            id: 1,
            name: "Sum".to_string()
        }
    );
}

#[test]
fn test_get_without_match_becomes_not_found() {
    let conn = setup();
    let err = conn
        .get::<Problem>("SELECT * FROM problems WHERE id = ?", params![42])
        .map_err(|err| Error::storage("get_problem", err))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_select_returns_all_matches() {
    let conn = setup();
    for (contest, name) in [(1, "A"), (2, "B"), (1, "C")] {
        conn.exec(
            "INSERT INTO problems(contest_id, name) VALUES (?, ?)",
            params![contest, name],
        )
        .unwrap();
    }

    let problems: Vec<Problem> = conn
        .select(
            "SELECT * FROM problems WHERE contest_id = ? ORDER BY id",
            params![1],
        )
        .unwrap();
    let names: Vec<&str> = problems.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C"]);

    let none: Vec<Problem> = conn
        .select("SELECT * FROM problems WHERE contest_id = ?", params![9])
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_transaction_context_respects_rollback() {
    let mut conn = setup();
    {
        let tx = conn.transaction().unwrap();
        tx.exec(
            "INSERT INTO problems(contest_id, name) VALUES (?, ?)",
            params![1, "Gone"],
        )
        .unwrap();
        let inside: Vec<Problem> = tx.select("SELECT * FROM problems", params![]).unwrap();
        assert_eq!(inside.len(), 1);
        tx.rollback().unwrap();
    }

    let after: Vec<Problem> = conn.select("SELECT * FROM problems", params![]).unwrap();
    assert!(after.is_empty());
}

#[test]
fn test_storage_error_keeps_context() {
    let conn = setup();
    let err = conn
        .exec("INSERT INTO missing(x) VALUES (?)", params![1])
        .map_err(|err| Error::storage("Missing::write", err))
        .unwrap_err();

    assert!(matches!(err, Error::Storage { .. }));
    assert!(err.to_string().starts_with("Missing::write: "));
}

#[test]
fn test_file_backed_connection() {
    let dir = tempfile::tempdir().unwrap();
    let conn = Connection::open(dir.path().join("judge.db")).unwrap();
    conn.execute_batch("CREATE TABLE problems (id INTEGER PRIMARY KEY, contest_id INTEGER, name TEXT);")
        .unwrap();
    let done = conn
        .exec(
            "INSERT INTO problems(contest_id, name) VALUES (?, ?)",
            params![3, "Disk"],
        )
        .unwrap();
    assert_eq!(done.last_insert_id, 1);
}
