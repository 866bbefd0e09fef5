//! SQL and argument-list fragments built from column maps.
//!
//! Every function here enumerates columns in lexicographic order, so the
//! placeholder positions in a SQL string and the argument list bound to it
//! always line up, and the same schema always renders the same text.
//!
//! # Examples
//!
//! ```
//! use dalgen_codegen::clause::{Receiver, equality_clause, join_arguments, placeholders};
//! use dalgen_core::{ColumnKind, ColumnType, Columns};
//!
//! let mut keys = Columns::new();
//! keys.insert("user_id".to_string(), ColumnType::new(ColumnKind::Int));
//! keys.insert("contest_id".to_string(), ColumnType::new(ColumnKind::Int));
//!
//! assert_eq!(equality_clause(&keys, " AND "), "contest_id = ? AND user_id = ?");
//! assert_eq!(placeholders(&keys), "?, ?");
//! assert_eq!(join_arguments(&keys, Receiver::Field("self")), "self.contest_id, self.user_id");
//! ```

use dalgen_core::{Columns, sorted_names};

use crate::rust_type::rust_ident;

/// How [`argument_list`] renders each column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver<'a> {
    /// Bare parameter identifiers (`user_id`, `r#type`).
    Parameter,
    /// Column names as they appear in SQL.
    Raw,
    /// Field reads on an expression (`self.user_id`).
    Field(&'a str),
}

/// Column names in lexicographic order.
pub fn sorted_columns(columns: &Columns) -> Vec<&str> {
    sorted_names(columns)
}

/// `a = ?` terms joined by `separator`.
pub fn equality_clause(columns: &Columns, separator: &str) -> String {
    sorted_columns(columns)
        .into_iter()
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(separator)
}

/// One `?` per column, comma separated.
pub fn placeholders(columns: &Columns) -> String {
    vec!["?"; columns.len()].join(", ")
}

/// One rendered argument per column.
pub fn argument_list(columns: &Columns, receiver: Receiver<'_>) -> Vec<String> {
    sorted_columns(columns)
        .into_iter()
        .map(|column| match receiver {
            Receiver::Parameter => rust_ident(column),
            Receiver::Raw => column.to_string(),
            Receiver::Field(expr) => format!("{expr}.{}", rust_ident(column)),
        })
        .collect()
}

/// [`argument_list`] joined with `, `.
pub fn join_arguments(columns: &Columns, receiver: Receiver<'_>) -> String {
    argument_list(columns, receiver).join(", ")
}
