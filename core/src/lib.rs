//! Schema model and key inference for the dalgen data-access generator.
//!
//! This crate holds everything that is decided before any code is rendered:
//!
//! - [`Schema`]: the table-of-tables description read from the schema
//!   source, with column types from a closed [`ColumnType`] vocabulary.
//! - [`naming`]: the casing rules that turn snake-case schema identifiers
//!   into record type names, accessor names and external field names.
//! - [`derive_table`]: primary-key, foreign-key and [`WriteStrategy`]
//!   inference from column naming conventions.
//! - [`validate_schema`]: configuration checks that abort a run before any
//!   output is produced.
//!
//! # Example
//!
//! ```
//! use dalgen_core::*;
//!
//! let int = ColumnType::new(ColumnKind::Int);
//! let schema = Schema::new()
//!     .with_table("enrollments", [("user_id", int), ("course_id", int)])
//!     .with_table("users", [("id", int)])
//!     .with_table("courses", [("id", int)]);
//!
//! let tables = derive_tables(&schema).unwrap();
//! let enrollments = tables.iter().find(|t| t.name == "enrollments").unwrap();
//! assert_eq!(sorted_names(&enrollments.primary_keys), vec!["course_id", "user_id"]);
//! assert!(enrollments.upsert_strategy());
//! ```

mod infer;
pub mod naming;
mod types;
mod validate;

pub use infer::{derive_table, derive_tables};
pub use types::*;
pub use validate::{ConfigError, ValidationError, validate_schema};
