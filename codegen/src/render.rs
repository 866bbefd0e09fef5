//! Rendering one derived table into a formatted Rust module.

use dalgen_core::Table;
use thiserror::Error;
use tracing::debug;

use crate::templates::{self, TableContext};

/// Default path generated code uses to reach the runtime crate.
pub const DEFAULT_RUNTIME_CRATE: &str = "dalgen_runtime";

/// Errors raised while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The configured runtime crate is not a Rust path.
    #[error("invalid runtime crate path {0:?}")]
    InvalidRuntimeCrate(String),

    /// The assembled source for a table is not valid Rust.
    #[error("generated code for table {table:?} does not parse: {source}")]
    Syntax {
        /// Table being rendered.
        table: String,
        /// Parser diagnostic.
        #[source]
        source: syn::Error,
    },
}

/// Renderer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Path of the runtime crate as seen from the generated code.
    pub runtime_crate: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
        }
    }
}

/// Renders tables into Rust modules.
///
/// Options are validated once by [`Renderer::new`]; rendering itself is
/// pure and can run on any number of threads.
///
/// # Examples
///
/// ```
/// use dalgen_codegen::{RenderOptions, Renderer};
/// use dalgen_core::{ColumnKind, ColumnType, Schema, derive_tables};
///
/// let schema = Schema::new().with_table("users", [("id", ColumnType::new(ColumnKind::Text))]);
/// let tables = derive_tables(&schema).unwrap();
///
/// let renderer = Renderer::new(RenderOptions::default()).unwrap();
/// let source = renderer.render(&tables[0]).unwrap();
/// assert!(source.starts_with("// Generated by dalgen from table \"users\". DO NOT EDIT."));
/// assert!(source.contains("pub fn get_user("));
/// ```
#[derive(Debug, Clone)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Creates a renderer.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidRuntimeCrate`] when the runtime crate
    /// path does not parse as a Rust path.
    pub fn new(options: RenderOptions) -> Result<Self, RenderError> {
        if syn::parse_str::<syn::Path>(&options.runtime_crate).is_err() {
            return Err(RenderError::InvalidRuntimeCrate(options.runtime_crate));
        }
        Ok(Self { options })
    }

    /// Renders the module for `table`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Syntax`] when the generated source does not
    /// parse, which only happens for names validation lets through but
    /// Rust rejects.
    pub fn render(&self, table: &Table) -> Result<String, RenderError> {
        let ctx = TableContext::new(table, &self.options.runtime_crate);
        let source = templates::file(&ctx);
        let parsed = syn::parse_file(&source).map_err(|source| RenderError::Syntax {
            table: table.name.clone(),
            source,
        })?;
        debug!(table = %table.name, record = %ctx.record, "rendered table");
        // prettyplease drops plain comments, so the header goes on afterwards.
        Ok(format!(
            "{}\n\n{}",
            templates::header(&table.name),
            prettyplease::unparse(&parsed)
        ))
    }
}

#[cfg(test)]
mod tests {
    use dalgen_core::{ColumnKind, ColumnType, Columns, WriteStrategy};

    use super::*;

    #[test]
    fn test_runtime_crate_must_be_a_path() {
        for path in ["dalgen_runtime", "crate::runtime", "::dalgen_runtime"] {
            let options = RenderOptions {
                runtime_crate: path.to_string(),
            };
            assert!(Renderer::new(options).is_ok(), "{path}");
        }
        let err = Renderer::new(RenderOptions {
            runtime_crate: "not a path".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, RenderError::InvalidRuntimeCrate(ref p) if p == "not a path"));
    }

    #[test]
    fn test_unparsable_table_is_a_syntax_error() {
        let mut fields = Columns::new();
        fields.insert("id".to_string(), ColumnType::new(ColumnKind::Int));
        let table = Table {
            name: "9lives".to_string(),
            fields: fields.clone(),
            primary_keys: fields,
            foreign_keys: Columns::new(),
            write: WriteStrategy::InsertOrUpdate {
                auto_key: "id".to_string(),
            },
        };

        let err = Renderer::new(RenderOptions::default())
            .unwrap()
            .render(&table)
            .unwrap_err();
        assert!(matches!(err, RenderError::Syntax { ref table, .. } if table == "9lives"));
    }
}
