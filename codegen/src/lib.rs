//! Code generation for the dalgen data-access generator.
//!
//! Turns derived [`Table`](dalgen_core::Table)s into Rust modules that
//! target the `dalgen_runtime` crate: one record type per table with
//! by-key and by-relation getters, a `write` method (upsert or
//! insert-or-update) and a `delete` method.
//!
//! Rendering runs in three steps:
//!
//! 1. Templates in this crate assemble the source text.
//! 2. The text is parsed with `syn`, so broken output is caught per table.
//! 3. `prettyplease` prints it in a stable layout.
//!
//! The same schema always renders byte-identical files.

pub mod clause;
mod generate;
mod render;
mod rust_type;
mod templates;

pub use generate::{
    DEFAULT_FILE_SUFFIX, GeneratedFile, GenerationFailure, GenerationOutcome, Generator,
    MODULE_INDEX_FILE,
};
pub use render::{DEFAULT_RUNTIME_CRATE, RenderError, RenderOptions, Renderer};
pub use rust_type::{field_type, parameter_type, rust_ident};
