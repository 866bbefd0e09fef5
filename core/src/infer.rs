//! Primary-key, foreign-key and write-strategy inference.
//!
//! Keys are inferred from column names alone:
//!
//! 1. A column `<entity>_id` is a foreign key when a table `<entity>s` is
//!    declared. Foreign keys also form a provisional composite primary key.
//! 2. A column named exactly `id` overrides step 1: it is the whole primary
//!    key. Writes use insert/update when it is a non-nullable `int`, upsert
//!    otherwise.
//! 3. Without `id`, the composite foreign-key set is the primary key and
//!    writes always use upsert.
//!
//! A `_id` column whose referenced table is missing is a plain column.
//!
//! # Examples
//!
//! ```
//! use dalgen_core::{ColumnKind, ColumnType, Schema, derive_table};
//!
//! let int = ColumnType::new(ColumnKind::Int);
//! let schema = Schema::new()
//!     .with_table("posts", [("id", int), ("user_id", int)])
//!     .with_table("users", [("id", int)]);
//!
//! let posts = derive_table(&schema, "posts", schema.get("posts").unwrap());
//! assert!(posts.primary_keys.contains_key("id"));
//! assert!(posts.foreign_keys.contains_key("user_id"));
//! assert!(!posts.upsert_strategy());
//! ```

use tracing::debug;

use crate::naming::{ID_COLUMN, referenced_table};
use crate::types::{Columns, RawTable, Schema, Table, WriteStrategy, sorted_names};
use crate::validate::{ConfigError, validate_schema};

/// Derives the [`Table`] for `name` from its raw columns.
///
/// This never fails; a table without any inferable key comes back with
/// empty `primary_keys`, which [`validate_schema`] reports.
pub fn derive_table(schema: &Schema, name: &str, raw: &RawTable) -> Table {
    let mut primary_keys = Columns::new();
    let mut foreign_keys = Columns::new();

    for (column, ty) in raw {
        let Some(target) = referenced_table(column) else {
            continue;
        };
        if schema.contains(&target) {
            primary_keys.insert(column.clone(), *ty);
            foreign_keys.insert(column.clone(), *ty);
        } else {
            debug!(table = name, column = %column, target = %target, "referenced table not declared, keeping plain column");
        }
    }

    let write = match raw.get(ID_COLUMN) {
        Some(id_type) => {
            primary_keys = Columns::from([(ID_COLUMN.to_string(), *id_type)]);
            if id_type.is_auto_increment() {
                WriteStrategy::InsertOrUpdate {
                    auto_key: ID_COLUMN.to_string(),
                }
            } else {
                WriteStrategy::Upsert {
                    conflict_keys: vec![ID_COLUMN.to_string()],
                }
            }
        }
        None => WriteStrategy::Upsert {
            conflict_keys: sorted_names(&primary_keys)
                .into_iter()
                .map(String::from)
                .collect(),
        },
    };

    Table {
        name: name.to_string(),
        fields: raw.clone(),
        primary_keys,
        foreign_keys,
        write,
    }
}

/// Validates the schema and derives every table, sorted by name.
///
/// # Errors
///
/// Returns [`ConfigError`] listing every configuration problem when the
/// schema is not fit for generation. No table is derived in that case.
pub fn derive_tables(schema: &Schema) -> Result<Vec<Table>, ConfigError> {
    let errors = validate_schema(schema);
    if !errors.is_empty() {
        return Err(ConfigError::new(errors));
    }

    Ok(schema
        .sorted_tables()
        .map(|(name, raw)| derive_table(schema, name, raw))
        .collect())
}
