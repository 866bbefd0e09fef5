//! Rendering a whole schema.

use dalgen_core::Table;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::render::{RenderError, Renderer};
use crate::templates;

/// Default suffix appended to the table name to form a file name.
pub const DEFAULT_FILE_SUFFIX: &str = "_generated";

/// File name of the module index.
pub const MODULE_INDEX_FILE: &str = "mod.rs";

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Table the file was rendered from. Empty for the module index.
    pub table: String,
    /// File name relative to the output directory.
    pub file_name: String,
    /// Formatted source.
    pub contents: String,
}

impl GeneratedFile {
    /// Module name the file is declared under (`posts_generated`).
    pub fn module_name(&self) -> &str {
        self.file_name
            .strip_suffix(".rs")
            .unwrap_or(&self.file_name)
    }
}

/// A table that failed to render.
#[derive(Debug)]
pub struct GenerationFailure {
    /// Table name.
    pub table: String,
    /// Why rendering failed.
    pub error: RenderError,
}

/// Result of rendering a schema.
#[derive(Debug, Default)]
pub struct GenerationOutcome {
    /// Successfully rendered files, sorted by table name.
    pub files: Vec<GeneratedFile>,
    /// Module index over `files`, when enabled.
    pub module_index: Option<GeneratedFile>,
    /// Per-table failures, sorted by table name.
    pub failures: Vec<GenerationFailure>,
}

impl GenerationOutcome {
    /// Returns `true` when every table rendered.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Every output file, module index last.
    pub fn all_files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter().chain(self.module_index.iter())
    }
}

/// Renders every table of a schema, optionally on a bounded thread pool.
///
/// # Examples
///
/// ```
/// use dalgen_codegen::{Generator, RenderOptions, Renderer};
/// use dalgen_core::{ColumnKind, ColumnType, Schema, derive_tables};
///
/// let text = ColumnType::new(ColumnKind::Text);
/// let schema = Schema::new()
///     .with_table("users", [("id", text)])
///     .with_table("tags", [("id", text), ("user_id", text)]);
/// let tables = derive_tables(&schema).unwrap();
///
/// let generator = Generator::new(Renderer::new(RenderOptions::default()).unwrap());
/// let outcome = generator.generate(&tables);
///
/// let names: Vec<_> = outcome.files.iter().map(|f| f.file_name.as_str()).collect();
/// assert_eq!(names, vec!["tags_generated.rs", "users_generated.rs"]);
/// assert!(outcome.is_success());
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    renderer: Renderer,
    file_suffix: String,
    module_index: bool,
    jobs: Option<usize>,
}

impl Generator {
    /// Creates a generator with the default file suffix, a module index and
    /// one job per CPU.
    pub fn new(renderer: Renderer) -> Self {
        Self {
            renderer,
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            module_index: true,
            jobs: None,
        }
    }

    /// Sets the suffix appended to table names in file names.
    pub fn with_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = suffix.into();
        self
    }

    /// Enables or disables the module index.
    pub fn with_module_index(mut self, enabled: bool) -> Self {
        self.module_index = enabled;
        self
    }

    /// Bounds the number of rendering threads. `None` uses the global pool.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Output file name for a table.
    pub fn file_name(&self, table: &str) -> String {
        format!("{table}{}.rs", self.file_suffix)
    }

    /// Renders all tables.
    ///
    /// A table that fails to render is reported in
    /// [`GenerationOutcome::failures`] and does not stop the others.
    pub fn generate(&self, tables: &[Table]) -> GenerationOutcome {
        let results = match self.jobs {
            Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => pool.install(|| self.render_all(tables)),
                Err(err) => {
                    warn!(%err, jobs, "could not build thread pool, using the global pool");
                    self.render_all(tables)
                }
            },
            None => self.render_all(tables),
        };

        let mut outcome = GenerationOutcome::default();
        for (table, result) in results {
            match result {
                Ok(contents) => outcome.files.push(GeneratedFile {
                    file_name: self.file_name(&table),
                    table,
                    contents,
                }),
                Err(error) => outcome.failures.push(GenerationFailure { table, error }),
            }
        }
        outcome.files.sort_by(|a, b| a.table.cmp(&b.table));
        outcome.failures.sort_by(|a, b| a.table.cmp(&b.table));

        if self.module_index {
            let modules: Vec<&str> = outcome.files.iter().map(GeneratedFile::module_name).collect();
            outcome.module_index = Some(GeneratedFile {
                table: String::new(),
                file_name: MODULE_INDEX_FILE.to_string(),
                contents: templates::module_index(&modules),
            });
        }

        info!(
            rendered = outcome.files.len(),
            failed = outcome.failures.len(),
            "generation finished"
        );
        outcome
    }

    fn render_all(&self, tables: &[Table]) -> Vec<(String, Result<String, RenderError>)> {
        tables
            .par_iter()
            .map(|table| (table.name.clone(), self.renderer.render(table)))
            .collect()
    }
}
