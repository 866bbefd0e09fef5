//! Schema source loading.
//!
//! The schema source is a TOML table of tables: every top-level table is a
//! storage table, every key inside it a column, every value a column type
//! token.
//!
//! ```toml
//! [users]
//! id = "text"
//! display_name = "text"
//!
//! [submissions]
//! id = "int"
//! user_id = "text"
//! score = "float?"
//! ```
//!
//! Any parse failure, including an unknown type token, fails the load; a
//! partially read schema is never returned.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use dalgen_core::{ColumnType, Columns, Schema};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{LoaderError, Result};

/// Parses a schema from TOML text.
///
/// # Errors
///
/// Returns [`TomlError`](crate::LoaderError::TomlError) if the text is not
/// valid TOML or a table value is not a table of strings, and
/// [`UnknownColumnType`](crate::LoaderError::UnknownColumnType) naming the
/// first offending table and column if a type token is outside the column
/// type vocabulary.
///
/// # Examples
///
/// ```
/// use dalgen_loader::parse_schema;
///
/// let schema = parse_schema("[users]\nid = \"text\"\nname = \"text\"\n").unwrap();
/// assert!(schema.contains("users"));
///
/// assert!(parse_schema("[users]\nid = \"uuid\"\n").is_err());
/// ```
pub fn parse_schema(source: &str) -> Result<Schema> {
    let raw: BTreeMap<String, BTreeMap<String, String>> = toml::from_str(source)?;
    let mut tables = HashMap::with_capacity(raw.len());
    for (table, columns) in raw {
        let mut parsed = Columns::with_capacity(columns.len());
        for (column, token) in columns {
            let ty = token
                .parse::<ColumnType>()
                .map_err(|source| LoaderError::UnknownColumnType {
                    table: table.clone(),
                    column: column.clone(),
                    source,
                })?;
            parsed.insert(column, ty);
        }
        tables.insert(table, parsed);
    }
    Ok(Schema::from(tables))
}

/// Reads and parses a schema file.
///
/// # Errors
///
/// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot be
/// read, or [`TomlError`](crate::LoaderError::TomlError) if parsing fails.
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema> {
    Ok(SchemaFile::load(path)?.schema)
}

/// A parsed schema together with the text it came from.
///
/// The source text is kept so that a generation manifest can fingerprint
/// exactly what was generated from.
#[derive(Debug, Clone)]
pub struct SchemaFile {
    /// File the schema was read from, if any.
    pub path: Option<PathBuf>,
    /// Raw TOML text.
    pub source: String,
    /// Parsed schema.
    pub schema: Schema,
}

impl SchemaFile {
    /// Reads and parses a schema file.
    ///
    /// # Errors
    ///
    /// See [`load_schema`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let mut file = Self::parse(source)?;
        debug!(path = %path.display(), tables = file.schema.len(), "loaded schema");
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Parses schema text that did not come from a file.
    ///
    /// # Errors
    ///
    /// See [`parse_schema`].
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let schema = parse_schema(&source)?;
        Ok(Self {
            path: None,
            source,
            schema,
        })
    }

    /// SHA-256 hex digest of the source text.
    pub fn checksum(&self) -> String {
        format!("{:x}", Sha256::digest(self.source.as_bytes()))
    }
}
