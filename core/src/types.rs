//! Schema type definitions for table-driven code generation.
//!
//! A [`Schema`] is the raw, two-level mapping read from the configuration
//! source: table name → column name → [`ColumnType`]. A [`Table`] is derived
//! from it once by [`derive_table`](crate::derive_table) and carries the
//! inferred keys and the [`WriteStrategy`] used to render its write method.
//!
//! Both levels are backed by [`HashMap`] and must be treated as unordered.
//! Anything that ends up in generated output goes through a sorted view
//! such as [`Schema::table_names`] or [`sorted_names`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::naming;

/// Storage kind of a column, independent of nullability.
///
/// # Examples
///
/// ```
/// use dalgen_core::ColumnKind;
///
/// assert_eq!(ColumnKind::Int.token(), "int");
/// assert_eq!(ColumnKind::Timestamp.token(), "timestamp");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// 64-bit signed integer. A non-nullable `int` column named `id` is an
    /// auto-increment key.
    Int,
    /// UTF-8 text.
    Text,
    /// Boolean.
    Bool,
    /// 64-bit floating point.
    Float,
    /// UTC timestamp.
    Timestamp,
    /// Raw bytes.
    Blob,
}

impl ColumnKind {
    /// Returns the canonical schema token for this kind.
    pub fn token(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Timestamp => "timestamp",
            Self::Blob => "blob",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        let kind = match token {
            "int" | "integer" => Self::Int,
            "text" | "string" => Self::Text,
            "bool" | "boolean" => Self::Bool,
            "float" | "real" | "double" => Self::Float,
            "timestamp" | "datetime" | "time" => Self::Timestamp,
            "blob" | "bytes" => Self::Blob,
            _ => return None,
        };
        Some(kind)
    }
}

/// Declared type of a column: a [`ColumnKind`] plus nullability.
///
/// Parsed from the schema token, where a trailing `?` marks the column
/// nullable.
///
/// # Examples
///
/// ```
/// use dalgen_core::{ColumnKind, ColumnType};
///
/// let ty: ColumnType = "text?".parse().unwrap();
/// assert_eq!(ty, ColumnType::nullable(ColumnKind::Text));
/// assert_eq!(ty.to_string(), "text?");
///
/// assert!("int".parse::<ColumnType>().unwrap().is_auto_increment());
/// assert!("uuid".parse::<ColumnType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnType {
    /// Storage kind.
    pub kind: ColumnKind,
    /// Whether the column accepts `NULL`.
    pub nullable: bool,
}

impl ColumnType {
    /// Creates a non-nullable column type.
    pub const fn new(kind: ColumnKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    /// Creates a nullable column type.
    pub const fn nullable(kind: ColumnKind) -> Self {
        Self {
            kind,
            nullable: true,
        }
    }

    /// Returns `true` for the integer type that storage assigns on insert.
    pub fn is_auto_increment(&self) -> bool {
        self.kind == ColumnKind::Int && !self.nullable
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.token())?;
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

/// Error returned when a schema token is outside the column type vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown column type `{0}` (expected int, text, bool, float, timestamp or blob, optionally followed by `?`)"
)]
pub struct UnknownColumnType(pub String);

impl FromStr for ColumnType {
    type Err = UnknownColumnType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let (token, nullable) = match token.strip_suffix('?') {
            Some(inner) => (inner.trim_end(), true),
            None => (token, false),
        };
        let kind = ColumnKind::from_token(&token.to_ascii_lowercase())
            .ok_or_else(|| UnknownColumnType(s.to_string()))?;
        Ok(Self { kind, nullable })
    }
}

impl TryFrom<String> for ColumnType {
    type Error = UnknownColumnType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnType> for String {
    fn from(value: ColumnType) -> Self {
        value.to_string()
    }
}

/// Column name → column type.
pub type Columns = HashMap<String, ColumnType>;

/// A table exactly as declared in the schema source.
pub type RawTable = Columns;

/// Returns the column names of `columns` in lexicographic order.
///
/// This is the only sanctioned way to enumerate a column map when the
/// result reaches generated output.
pub fn sorted_names(columns: &Columns) -> Vec<&str> {
    let mut names: Vec<&str> = columns.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}

/// The whole schema: table name → [`RawTable`].
///
/// Loaded once and treated as read-only afterwards. Lookups are by key;
/// ordered enumeration goes through [`table_names`](Schema::table_names).
///
/// # Examples
///
/// ```
/// use dalgen_core::{ColumnKind, ColumnType, Schema};
///
/// let schema = Schema::new()
///     .with_table("users", [("id", ColumnType::new(ColumnKind::Text))])
///     .with_table("posts", [("id", ColumnType::new(ColumnKind::Int))]);
///
/// assert!(schema.contains("users"));
/// assert_eq!(schema.table_names(), vec!["posts", "users"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    tables: HashMap<String, RawTable>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table built from `(column, type)` pairs.
    pub fn with_table<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<String>,
    {
        let columns = columns
            .into_iter()
            .map(|(column, ty)| (column.into(), ty))
            .collect();
        self.tables.insert(name.into(), columns);
        self
    }

    /// Looks up a table by name.
    pub fn get(&self, name: &str) -> Option<&RawTable> {
        self.tables.get(name)
    }

    /// Returns `true` if a table with this name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns the number of declared tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if the schema declares no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Returns all table names in lexicographic order.
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterates over `(name, table)` pairs in lexicographic name order.
    pub fn sorted_tables(&self) -> impl Iterator<Item = (&str, &RawTable)> {
        self.table_names()
            .into_iter()
            .filter_map(|name| self.tables.get_key_value(name))
            .map(|(name, table)| (name.as_str(), table))
    }
}

impl From<HashMap<String, RawTable>> for Schema {
    fn from(tables: HashMap<String, RawTable>) -> Self {
        Self { tables }
    }
}

/// How the generated `write` method persists a record.
///
/// Each variant carries what its template needs; the renderer matches on
/// it instead of branching inside a single template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WriteStrategy {
    /// One `INSERT ... ON CONFLICT (...) DO UPDATE` statement. Safe whenever
    /// keys are assigned by the caller.
    Upsert {
        /// Conflict target columns, sorted.
        conflict_keys: Vec<String>,
    },
    /// `INSERT` when the auto-increment key is zero, `UPDATE` otherwise.
    InsertOrUpdate {
        /// The integer key column filled in by storage on insert.
        auto_key: String,
    },
}

/// A table with its inferred keys, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Raw table name.
    pub name: String,
    /// Every declared column, keys included.
    pub fields: Columns,
    /// Columns identifying a row. Non-empty for every validated table.
    pub primary_keys: Columns,
    /// Columns referencing another declared table.
    pub foreign_keys: Columns,
    /// Write method selection.
    pub write: WriteStrategy,
}

impl Table {
    /// Returns `true` when writes use the single-statement upsert.
    pub fn upsert_strategy(&self) -> bool {
        matches!(self.write, WriteStrategy::Upsert { .. })
    }

    /// Returns every field except `column`.
    pub fn fields_without(&self, column: &str) -> Columns {
        self.fields
            .iter()
            .filter(|(name, _)| name.as_str() != column)
            .map(|(name, ty)| (name.clone(), *ty))
            .collect()
    }

    /// Name of the generated record type.
    pub fn struct_name(&self) -> String {
        naming::struct_name(&self.name)
    }
}
