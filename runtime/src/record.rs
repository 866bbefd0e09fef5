//! Traits every generated record implements or requires.

use rusqlite::Row;

use crate::error::Result;

/// Builds a record from a result row, reading columns by name.
///
/// Generated for every record.
pub trait FromRow: Sized {
    /// Reads one row.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Validation hook run by a record's `write` before any storage access.
///
/// Generated code requires an implementation for every record but never
/// provides one. An error returned here is handed back to the caller of
/// `write` as-is.
///
/// # Examples
///
/// ```
/// use dalgen_runtime::{Error, Result, Verify};
///
/// struct User {
///     display_name: String,
/// }
///
/// impl Verify for User {
///     fn verify(&self) -> Result<()> {
///         if self.display_name.is_empty() {
///             return Err(Error::invalid("display name must not be empty"));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(User { display_name: String::new() }.verify().is_err());
/// ```
pub trait Verify {
    /// Checks the record before it is written.
    fn verify(&self) -> Result<()>;
}
