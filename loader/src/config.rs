//! Generator configuration.
//!
//! Defines the YAML-serializable configuration of a generation run. Every
//! key is optional; command-line flags override file values.
//!
//! # Example YAML
//!
//! ```yaml
//! schema: models/models.toml
//! output: src/models
//! runtime_crate: dalgen_runtime
//! file_suffix: _generated
//! module_index: true
//! jobs: 4
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LoaderError, Result};

/// Default file name looked up by the CLI when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "dalgen.yaml";

/// Settings for one generator run.
///
/// # Examples
///
/// ```
/// use dalgen_loader::GeneratorConfig;
///
/// let config: GeneratorConfig = serde_yaml::from_str("output: src/models\njobs: 2\n").unwrap();
/// assert_eq!(config.output.to_str(), Some("src/models"));
/// assert_eq!(config.runtime_crate, "dalgen_runtime");
/// assert_eq!(config.file_suffix, "_generated");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Schema source file.
    pub schema: PathBuf,
    /// Directory receiving one file per table.
    pub output: PathBuf,
    /// Path of the runtime crate as seen from the generated code.
    pub runtime_crate: String,
    /// Appended to the table name to form each file stem.
    pub file_suffix: String,
    /// Whether to write a `mod.rs` declaring every generated module.
    pub module_index: bool,
    /// Rendering threads (default: number of CPUs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema: PathBuf::from("models.toml"),
            output: PathBuf::from("models"),
            runtime_crate: "dalgen_runtime".to_string(),
            file_suffix: "_generated".to_string(),
            module_index: true,
            jobs: None,
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// Relative `schema` and `output` paths are resolved against the
    /// directory containing the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](LoaderError::IoError) if the file cannot be read,
    /// [`YamlError`](LoaderError::YamlError) if parsing fails, or
    /// [`InvalidConfig`](LoaderError::InvalidConfig) if a value is unusable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](LoaderError::IoError) if the file cannot be
    /// written, or [`YamlError`](LoaderError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks values that YAML parsing alone cannot reject.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfig`](LoaderError::InvalidConfig) when the
    /// runtime crate is not a Rust path, the file suffix is empty or would
    /// not produce a module name, or `jobs` is zero.
    pub fn validate(&self) -> Result<()> {
        if !is_rust_path(&self.runtime_crate) {
            return Err(LoaderError::InvalidConfig(format!(
                "runtime_crate {:?} is not a Rust path",
                self.runtime_crate
            )));
        }
        // Without a suffix a table named `mod` or `type` yields an unusable module.
        if self.file_suffix.is_empty() {
            return Err(LoaderError::InvalidConfig(
                "file_suffix must not be empty".to_string(),
            ));
        }
        if !self
            .file_suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(LoaderError::InvalidConfig(format!(
                "file_suffix {:?} may only contain ASCII letters, digits and underscores",
                self.file_suffix
            )));
        }
        if self.jobs == Some(0) {
            return Err(LoaderError::InvalidConfig(
                "jobs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns a copy with relative paths joined onto `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        if self.schema.is_relative() {
            self.schema = base.join(&self.schema);
        }
        if self.output.is_relative() {
            self.output = base.join(&self.output);
        }
        self
    }
}

fn is_rust_path(path: &str) -> bool {
    let path = path.strip_prefix("::").unwrap_or(path);
    !path.is_empty()
        && path.split("::").all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
schema: schema/models.toml
output: src/models
runtime_crate: crate::runtime
file_suffix: _gen
module_index: false
jobs: 8
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: GeneratorConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.schema, PathBuf::from("schema/models.toml"));
        assert_eq!(config.output, PathBuf::from("src/models"));
        assert_eq!(config.runtime_crate, "crate::runtime");
        assert_eq!(config.file_suffix, "_gen");
        assert!(!config.module_index);
        assert_eq!(config.jobs, Some(8));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: GeneratorConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: std::result::Result<GeneratorConfig, _> =
            serde_yaml::from_str("outptu: src/models\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_runtime = GeneratorConfig {
            runtime_crate: "dalgen-runtime".to_string(),
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            bad_runtime.validate(),
            Err(LoaderError::InvalidConfig(_))
        ));

        let bad_suffix = GeneratorConfig {
            file_suffix: ".gen".to_string(),
            ..GeneratorConfig::default()
        };
        assert!(bad_suffix.validate().is_err());

        let zero_jobs = GeneratorConfig {
            jobs: Some(0),
            ..GeneratorConfig::default()
        };
        assert!(zero_jobs.validate().is_err());
    }

    #[test]
    fn test_rust_paths() {
        assert!(is_rust_path("dalgen_runtime"));
        assert!(is_rust_path("crate::db::runtime"));
        assert!(is_rust_path("::dalgen_runtime"));
        assert!(!is_rust_path(""));
        assert!(!is_rust_path("a::"));
        assert!(!is_rust_path("1st"));
    }

    #[test]
    fn test_load_resolves_paths_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dalgen.yaml");
        std::fs::write(&path, sample_yaml()).unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.schema, dir.path().join("schema/models.toml"));
        assert_eq!(config.output, dir.path().join("src/models"));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dalgen.yaml");

        let original: GeneratorConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded: GeneratorConfig =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_validate_rejects_empty_suffix() {
        let config: GeneratorConfig = serde_yaml::from_str("file_suffix: \"\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, LoaderError::InvalidConfig(ref msg) if msg.contains("must not be empty")));
    }
}
