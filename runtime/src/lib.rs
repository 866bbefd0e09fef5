//! Runtime support for dalgen-generated data-access code.
//!
//! Generated files depend on this crate only. It provides:
//!
//! - [`DbContext`]: the storage context passed to every generated
//!   accessor, implemented for [`rusqlite::Connection`] and
//!   [`rusqlite::Transaction`].
//! - [`FromRow`]: row-to-record mapping, generated per record.
//! - [`Verify`]: the validation hook each record must implement by hand.
//! - [`Error`]: storage errors wrapped with accessor context, a
//!   distinguishable not-found case, and verbatim validation errors.
//!
//! The crates the generated code names (`rusqlite`, `serde`, `chrono`) are
//! re-exported so that consumers need no extra dependencies.
//!
//! # Example
//!
//! ```
//! use dalgen_runtime::{DbContext, Error};
//! use rusqlite::Connection;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! conn.execute_batch("CREATE TABLE users (id TEXT PRIMARY KEY);").unwrap();
//!
//! let missing: rusqlite::Result<(String,)> = conn
//!     .query_row("SELECT id FROM users WHERE id = ?", ["nobody"], |row| Ok((row.get(0)?,)));
//! let err = Error::storage("get_user", missing.unwrap_err());
//! assert!(err.is_not_found());
//! ```

mod context;
mod error;
mod record;

pub use context::{DbContext, Execution};
pub use error::{Error, Result};
pub use record::{FromRow, Verify};

pub use chrono;
pub use rusqlite;
pub use serde;
