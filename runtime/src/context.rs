//! Storage context contract.
//!
//! Generated accessors take a [`DbContext`] on every call and never open,
//! commit or roll back anything themselves. Passing a [`Connection`] runs
//! each statement on its own; passing a [`Transaction`] makes the caller's
//! transaction boundaries apply.
//!
//! # Example
//!
//! ```
//! use dalgen_runtime::{DbContext, FromRow};
//! use rusqlite::{Connection, Row, params};
//!
//! struct Tag {
//!     name: String,
//! }
//!
//! impl FromRow for Tag {
//!     fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
//!         Ok(Self { name: row.get("name")? })
//!     }
//! }
//!
//! let conn = Connection::open_in_memory().unwrap();
//! conn.execute_batch("CREATE TABLE tags (name TEXT PRIMARY KEY);").unwrap();
//!
//! let done = conn.exec("INSERT INTO tags(name) VALUES (?)", params!["rust"]).unwrap();
//! assert_eq!(done.rows_affected, 1);
//!
//! let tag: Tag = conn.get("SELECT * FROM tags WHERE name = ?", params!["rust"]).unwrap();
//! assert_eq!(tag.name, "rust");
//! ```

use rusqlite::{Connection, ToSql, Transaction};
use tracing::trace;

use crate::record::FromRow;

/// Outcome of [`DbContext::exec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    /// Rows changed by the statement.
    pub rows_affected: usize,
    /// Rowid assigned by the most recent successful insert on the connection.
    pub last_insert_id: i64,
}

/// What generated code needs from storage: placeholder-bound single-row and
/// multi-row fetches mapped onto records, and statement execution.
pub trait DbContext {
    /// Fetches exactly one row.
    ///
    /// # Errors
    ///
    /// Returns `QueryReturnedNoRows` when nothing matches.
    fn get<T: FromRow>(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<T>;

    /// Fetches every matching row, in the order the statement returns them.
    fn select<T: FromRow>(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<Vec<T>>;

    /// Executes a statement that returns no rows.
    fn exec(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<Execution>;
}

impl DbContext for Connection {
    fn get<T: FromRow>(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<T> {
        trace!(sql, "get");
        let mut stmt = self.prepare_cached(sql)?;
        stmt.query_row(params, |row| T::from_row(row))
    }

    fn select<T: FromRow>(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<Vec<T>> {
        trace!(sql, "select");
        let mut stmt = self.prepare_cached(sql)?;
        let rows = stmt.query_map(params, |row| T::from_row(row))?;
        rows.collect()
    }

    fn exec(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<Execution> {
        trace!(sql, "exec");
        let rows_affected = self.prepare_cached(sql)?.execute(params)?;
        Ok(Execution {
            rows_affected,
            last_insert_id: self.last_insert_rowid(),
        })
    }
}

impl DbContext for Transaction<'_> {
    fn get<T: FromRow>(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<T> {
        (**self).get(sql, params)
    }

    fn select<T: FromRow>(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<Vec<T>> {
        (**self).select(sql, params)
    }

    fn exec(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<Execution> {
        (**self).exec(sql, params)
    }
}
