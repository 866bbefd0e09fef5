//! Input loading for the dalgen generator.
//!
//! This crate reads everything a generation run starts from and records
//! what it produced:
//!
//! - [`parse_schema`] / [`SchemaFile`]: the TOML schema source.
//! - [`GeneratorConfig`]: the YAML run configuration.
//! - [`GenerationManifest`]: per-directory record of generated files with
//!   SHA-256 checksums, used for stale-file cleanup and drift checks.
//!
//! # Quick start
//!
//! ```no_run
//! use dalgen_loader::{GeneratorConfig, SchemaFile};
//!
//! let config = GeneratorConfig::load("dalgen.yaml").unwrap();
//! let schema = SchemaFile::load(&config.schema).unwrap();
//! println!("{} tables", schema.schema.len());
//! ```

mod config;
mod error;
mod loader;
mod manifest;

pub use config::{DEFAULT_CONFIG_FILE, GeneratorConfig};
pub use error::{LoaderError, Result};
pub use loader::{SchemaFile, load_schema, parse_schema};
pub use manifest::{FileEntry, GenerationManifest, MANIFEST_FILE};
