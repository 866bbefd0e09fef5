//! Generation manifest.
//!
//! The manifest records what the last run wrote into an output directory:
//! the schema fingerprint and, per table, the file name and a SHA-256 of
//! its content. It lets the next run remove files for tables that no longer
//! exist and lets `dalgen check` tell regenerated output apart from stale
//! or hand-edited files.
//!
//! # Examples
//!
//! ```no_run
//! use dalgen_loader::GenerationManifest;
//!
//! let mut manifest = GenerationManifest::new("0.1.0", "abc123");
//! manifest.record_table("users", "users_generated.rs", "pub struct User {}\n");
//!
//! manifest.save_to_dir("src/models").unwrap();
//! let loaded = GenerationManifest::load_from_dir("src/models").unwrap().unwrap();
//! assert!(loaded.tables.contains_key("users"));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE: &str = ".dalgen-manifest.json";

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name relative to the output directory.
    pub file: String,
    /// SHA-256 hex digest of the written content.
    pub checksum: String,
}

impl FileEntry {
    /// Creates an entry, hashing `contents`.
    pub fn new(file: impl Into<String>, contents: &str) -> Self {
        Self {
            file: file.into(),
            checksum: GenerationManifest::checksum(contents.as_bytes()),
        }
    }
}

/// Record of one generation run.
///
/// Maps are ordered so the manifest itself serializes deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationManifest {
    /// Manifest format version.
    pub version: String,
    /// Version of the generator that wrote the files.
    pub tool_version: String,
    /// SHA-256 of the schema source the files were generated from.
    pub schema_checksum: String,
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// Generated file per table name.
    pub tables: BTreeMap<String, FileEntry>,
    /// Module index file, when one was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_index: Option<FileEntry>,
}

impl GenerationManifest {
    /// Creates an empty manifest stamped with the current time.
    pub fn new(tool_version: impl Into<String>, schema_checksum: impl Into<String>) -> Self {
        Self {
            version: "1.0".to_string(),
            tool_version: tool_version.into(),
            schema_checksum: schema_checksum.into(),
            generated_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            tables: BTreeMap::new(),
            module_index: None,
        }
    }

    /// Loads a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot
    /// be read, or [`JsonError`](crate::LoaderError::JsonError) if the
    /// content is not valid manifest JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads the manifest of an output directory, if the directory has one.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), except that a missing file is `Ok(None)`.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = dir.as_ref().join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Saves the manifest as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot
    /// be written, or [`JsonError`](crate::LoaderError::JsonError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Saves the manifest into an output directory.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn save_to_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        self.save(dir.as_ref().join(MANIFEST_FILE))
    }

    /// Records the file written for `table`.
    pub fn record_table(&mut self, table: impl Into<String>, file: impl Into<String>, contents: &str) {
        self.tables
            .insert(table.into(), FileEntry::new(file, contents));
    }

    /// Records the module index file.
    pub fn record_module_index(&mut self, file: impl Into<String>, contents: &str) {
        self.module_index = Some(FileEntry::new(file, contents));
    }

    /// Every file name the manifest accounts for, sorted.
    pub fn files(&self) -> BTreeSet<&str> {
        self.tables
            .values()
            .chain(self.module_index.as_ref())
            .map(|entry| entry.file.as_str())
            .collect()
    }

    /// Entry recorded under a file name, table files and module index alike.
    pub fn find_file(&self, file: &str) -> Option<&FileEntry> {
        self.tables
            .values()
            .chain(self.module_index.as_ref())
            .find(|entry| entry.file == file)
    }

    /// Files recorded in `self` that `newer` no longer produces.
    ///
    /// # Examples
    ///
    /// ```
    /// use dalgen_loader::GenerationManifest;
    ///
    /// let mut old = GenerationManifest::new("0.1.0", "a");
    /// old.record_table("users", "users_generated.rs", "");
    /// old.record_table("posts", "posts_generated.rs", "");
    ///
    /// let mut new = GenerationManifest::new("0.1.0", "b");
    /// new.record_table("users", "users_generated.rs", "");
    ///
    /// assert_eq!(old.stale_files(&new), vec!["posts_generated.rs".to_string()]);
    /// ```
    pub fn stale_files(&self, newer: &GenerationManifest) -> Vec<String> {
        let keep = newer.files();
        self.files()
            .into_iter()
            .filter(|file| !keep.contains(file))
            .map(String::from)
            .collect()
    }

    /// Computes the SHA-256 hex digest of `bytes`.
    pub fn checksum(bytes: &[u8]) -> String {
        format!("{:x}", Sha256::digest(bytes))
    }
}
