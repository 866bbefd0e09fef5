//! Schema validation.
//!
//! Catches configuration problems that would otherwise surface as broken
//! generated code: tables without an inferable primary key, names that are
//! not identifiers, nullable keys and colliding record names. Validation
//! runs before any table is rendered and any problem aborts the run.
//!
//! # Examples
//!
//! ```
//! use dalgen_core::*;
//!
//! let text = ColumnType::new(ColumnKind::Text);
//! let schema = Schema::new().with_table("users", [("id", text)]);
//! assert!(validate_schema(&schema).is_empty());
//!
//! // No `id` column and no relation column: nothing identifies a row.
//! let bad = Schema::new().with_table("settings", [("name", text)]);
//! assert_eq!(
//!     validate_schema(&bad),
//!     vec![ValidationError::NoPrimaryKey("settings".to_string())]
//! );
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

use crate::infer::derive_table;
use crate::naming::struct_name;
use crate::types::{Schema, sorted_names};

/// Identifiers that cannot be emitted even as raw identifiers.
const RESERVED_IDENTIFIERS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Prelude types that generated field and return types name unqualified.
const RESERVED_RECORD_NAMES: &[&str] = &["Option", "String", "Vec"];

/// Schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The schema declares no tables.
    #[error("schema declares no tables")]
    EmptySchema,
    /// Table name is not an identifier or has no singular form.
    #[error("invalid table name: {0:?}")]
    InvalidTableName(String),
    /// Table declares no columns.
    #[error("table {0:?} declares no columns")]
    EmptyTable(String),
    /// Column name is not usable as a field identifier.
    #[error("invalid column name {column:?} in table {table:?}")]
    InvalidColumnName {
        /// Table declaring the column.
        table: String,
        /// Offending column.
        column: String,
    },
    /// Neither an `id` column nor a relation column identifies a row.
    #[error("table {0:?} has no primary key: add an `id` column or a `<table>_id` relation column")]
    NoPrimaryKey(String),
    /// A primary-key column is declared nullable.
    #[error("primary key column {column:?} of table {table:?} cannot be nullable")]
    NullablePrimaryKey {
        /// Table declaring the column.
        table: String,
        /// Offending column.
        column: String,
    },
    /// The record type would shadow a prelude type used by generated code.
    #[error("table {table:?} generates record type {name}, which shadows the prelude type")]
    ReservedRecordName {
        /// Offending table.
        table: String,
        /// Record type name.
        name: String,
    },
    /// Several tables map to the same record type name.
    #[error("tables {tables:?} all generate record type {name}")]
    DuplicateRecordName {
        /// Colliding record type name.
        name: String,
        /// Tables producing it, sorted.
        tables: Vec<String>,
    },
}

/// Aggregate of every [`ValidationError`] found in a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid schema: {}", render_errors(.errors))]
pub struct ConfigError {
    errors: Vec<ValidationError>,
}

impl ConfigError {
    /// Wraps a non-empty list of validation errors.
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// The individual problems, in schema order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }
}

fn render_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validates a schema for generation.
///
/// Tables are checked in sorted order and all problems are collected, so
/// a single run reports everything that needs fixing.
pub fn validate_schema(schema: &Schema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if schema.is_empty() {
        errors.push(ValidationError::EmptySchema);
        return errors;
    }

    let mut record_names: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (name, raw) in schema.sorted_tables() {
        if !is_identifier(name) || name.chars().count() < 2 {
            errors.push(ValidationError::InvalidTableName(name.to_string()));
            continue;
        }
        let record = struct_name(name);
        if RESERVED_RECORD_NAMES.contains(&record.as_str()) {
            errors.push(ValidationError::ReservedRecordName {
                table: name.to_string(),
                name: record.clone(),
            });
        }
        record_names
            .entry(record)
            .or_default()
            .push(name.to_string());

        if raw.is_empty() {
            errors.push(ValidationError::EmptyTable(name.to_string()));
            continue;
        }

        let mut columns_valid = true;
        for column in sorted_names(raw) {
            if !is_identifier(column) || RESERVED_IDENTIFIERS.contains(&column) {
                errors.push(ValidationError::InvalidColumnName {
                    table: name.to_string(),
                    column: column.to_string(),
                });
                columns_valid = false;
            }
        }
        if !columns_valid {
            continue;
        }

        let table = derive_table(schema, name, raw);
        if table.primary_keys.is_empty() {
            errors.push(ValidationError::NoPrimaryKey(name.to_string()));
            continue;
        }
        for column in sorted_names(&table.primary_keys) {
            if table.primary_keys[column].nullable {
                errors.push(ValidationError::NullablePrimaryKey {
                    table: name.to_string(),
                    column: column.to_string(),
                });
            }
        }
    }

    for (name, tables) in record_names {
        if tables.len() > 1 {
            errors.push(ValidationError::DuplicateRecordName { name, tables });
        }
    }

    errors
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
