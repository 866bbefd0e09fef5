//! Error types for loading schemas, configuration and manifests.
//!
//! Every variant is fatal to a generation run: nothing is written when the
//! schema or the configuration cannot be read.

use thiserror::Error;

/// Errors that can occur while loading generator inputs.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed schema source.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Malformed generator configuration.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A column type token is outside the vocabulary.
    #[error("table {table:?}, column {column:?}: {source}")]
    UnknownColumnType {
        /// Table declaring the column.
        table: String,
        /// Offending column.
        column: String,
        /// Parse failure.
        #[source]
        source: dalgen_core::UnknownColumnType,
    },

    /// Manifest parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
