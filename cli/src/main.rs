use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use dalgen_codegen::{GeneratedFile, Generator, RenderOptions, Renderer};
use dalgen_core::naming;
use dalgen_core::{Table, WriteStrategy, derive_tables, sorted_names};
use dalgen_loader::{DEFAULT_CONFIG_FILE, GenerationManifest, GeneratorConfig, SchemaFile};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format of `inspect`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "dalgen")]
#[command(about = "Generate Rust data-access modules from a table schema")]
#[command(version)]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render every table and write the generated modules.
    Generate(GenerateArgs),
    /// Verify the generated modules on disk match the schema.
    Check(CheckArgs),
    /// Print the keys, write strategy and accessors derived for each table.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    /// Generator configuration file (default: dalgen.yaml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Schema file, overriding the configuration.
    #[arg(long)]
    schema: Option<PathBuf>,
    /// Output directory, overriding the configuration.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[command(flatten)]
    config: ConfigArgs,
    /// Number of parallel rendering jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Debug, Args)]
struct InspectArgs {
    #[command(flatten)]
    config: ConfigArgs,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Check(args) => run_check(args),
        Command::Inspect(args) => run_inspect(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "dalgen=debug" } else { "dalgen=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let mut config = resolve_config(&args.config)?;
    if args.jobs.is_some() {
        config.jobs = args.jobs;
    }
    config.validate().map_err(|e| e.to_string())?;

    let (schema, tables) = load_tables(&config)?;
    let outcome = build_generator(&config)?.generate(&tables);

    fs::create_dir_all(&config.output).map_err(|e| {
        format!(
            "Failed to create output directory '{}': {e}",
            config.output.display()
        )
    })?;
    let previous = GenerationManifest::load_from_dir(&config.output)
        .map_err(|e| format!("Failed to load manifest: {e}"))?;

    let mut manifest = GenerationManifest::new(PACKAGE_VERSION, schema.checksum());
    for file in &outcome.files {
        write_generated(&config.output, file)?;
        manifest.record_table(&file.table, &file.file_name, &file.contents);
    }
    if let Some(index) = &outcome.module_index {
        write_generated(&config.output, index)?;
        manifest.record_module_index(&index.file_name, &index.contents);
    }

    let mut removed = 0;
    if let Some(previous) = previous {
        for stale in previous.stale_files(&manifest) {
            if remove_stale(&config.output, &stale)? {
                removed += 1;
            }
        }
    }

    manifest
        .save_to_dir(&config.output)
        .map_err(|e| format!("Failed to save manifest: {e}"))?;

    println!("Generate Summary:");
    println!("  Tables: {}", tables.len());
    println!("  Written: {}", outcome.files.len());
    println!("  Removed: {removed} (stale)");
    println!("  Failed: {}", outcome.failures.len());
    println!("  Output: {}", config.output.display());

    if !outcome.is_success() {
        eprintln!("\nFailures:");
        for failure in &outcome.failures {
            eprintln!("  {}: {}", failure.table, failure.error);
        }
        return Err(format!(
            "{} table(s) failed to render",
            outcome.failures.len()
        ));
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let config = resolve_config(&args.config)?;
    let (_, tables) = load_tables(&config)?;
    let outcome = build_generator(&config)?.generate(&tables);
    let recorded = GenerationManifest::load_from_dir(&config.output)
        .map_err(|e| format!("Failed to load manifest: {e}"))?;

    let mut problems = Vec::new();
    for failure in &outcome.failures {
        problems.push(format!("failed: {} ({})", failure.table, failure.error));
    }

    for file in outcome.all_files() {
        let path = config.output.join(&file.file_name);
        match fs::read_to_string(&path) {
            Ok(on_disk) if on_disk == file.contents => {}
            Ok(on_disk) => {
                let edited = recorded
                    .as_ref()
                    .and_then(|manifest| manifest.find_file(&file.file_name))
                    .is_some_and(|entry| {
                        entry.checksum != GenerationManifest::checksum(on_disk.as_bytes())
                    });
                let kind = if edited { "edited" } else { "stale" };
                problems.push(format!("{kind}: {}", file.file_name));
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                problems.push(format!("missing: {}", file.file_name));
            }
            Err(err) => return Err(format!("Failed to read '{}': {err}", path.display())),
        }
    }

    if let Some(recorded) = &recorded {
        let expected: BTreeSet<&str> = outcome
            .all_files()
            .map(|file| file.file_name.as_str())
            .collect();
        for file in recorded.files() {
            if !expected.contains(file) && config.output.join(file).exists() {
                problems.push(format!("obsolete: {file}"));
            }
        }
    }

    if problems.is_empty() {
        println!(
            "{} generated file(s) up to date in {}",
            outcome.all_files().count(),
            config.output.display()
        );
        return Ok(());
    }

    for problem in &problems {
        println!("  {problem}");
    }
    Err(format!(
        "{} generated file(s) out of date; run `dalgen generate`",
        problems.len()
    ))
}

/// What `inspect` reports for one table.
#[derive(Debug, Serialize)]
struct TableSummary<'a> {
    table: &'a str,
    record: String,
    file: String,
    primary_keys: Vec<&'a str>,
    foreign_keys: Vec<&'a str>,
    write: &'a WriteStrategy,
    accessors: Vec<String>,
}

impl<'a> TableSummary<'a> {
    fn new(table: &'a Table, generator: &Generator) -> Self {
        let record = table.struct_name();
        let mut accessors = vec![naming::function_name(&naming::primary_accessor(
            &table.name,
        ))];
        for column in sorted_names(&table.foreign_keys) {
            accessors.push(naming::function_name(&naming::relation_accessor(
                column,
                &table.name,
            )));
        }
        accessors.push(format!("{record}::write"));
        accessors.push(format!("{record}::delete"));

        Self {
            table: &table.name,
            file: generator.file_name(&table.name),
            primary_keys: sorted_names(&table.primary_keys),
            foreign_keys: sorted_names(&table.foreign_keys),
            write: &table.write,
            accessors,
            record,
        }
    }
}

fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let config = resolve_config(&args.config)?;
    let (_, tables) = load_tables(&config)?;
    let generator = build_generator(&config)?;
    let summaries: Vec<TableSummary<'_>> = tables
        .iter()
        .map(|table| TableSummary::new(table, &generator))
        .collect();

    match args.format {
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summaries)
                .map_err(|e| format!("Failed to serialize tables: {e}"))?;
            println!("{json}");
        }
        CliOutputFormat::Table => {
            for summary in &summaries {
                println!("{} -> {}", summary.table, summary.file);
                println!("  record        {}", summary.record);
                println!("  primary keys  {}", summary.primary_keys.join(", "));
                println!("  foreign keys  {}", list_or_dash(&summary.foreign_keys));
                println!("  write         {}", describe_write(summary.write));
                println!("  accessors     {}", summary.accessors.join(", "));
            }
        }
    }
    Ok(())
}

fn list_or_dash(items: &[&str]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn describe_write(write: &WriteStrategy) -> String {
    match write {
        WriteStrategy::Upsert { conflict_keys } => {
            format!("upsert on ({})", conflict_keys.join(", "))
        }
        WriteStrategy::InsertOrUpdate { auto_key } => {
            format!("insert or update ({auto_key} assigned on insert)")
        }
    }
}

/// Loads the configuration named on the command line, or `dalgen.yaml` in
/// the working directory, or the defaults, then applies flag overrides.
fn resolve_config(args: &ConfigArgs) -> Result<GeneratorConfig, String> {
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|path| path.exists()),
    };
    let mut config = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            GeneratorConfig::load(&path)
                .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };

    if let Some(schema) = &args.schema {
        config.schema = schema.clone();
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    Ok(config)
}

fn load_tables(config: &GeneratorConfig) -> Result<(SchemaFile, Vec<Table>), String> {
    let schema = SchemaFile::load(&config.schema)
        .map_err(|e| format!("Failed to load schema '{}': {e}", config.schema.display()))?;
    let tables = derive_tables(&schema.schema).map_err(|e| e.to_string())?;
    info!(tables = tables.len(), schema = %config.schema.display(), "schema loaded");
    Ok((schema, tables))
}

fn build_generator(config: &GeneratorConfig) -> Result<Generator, String> {
    let renderer = Renderer::new(RenderOptions {
        runtime_crate: config.runtime_crate.clone(),
    })
    .map_err(|e| e.to_string())?;
    Ok(Generator::new(renderer)
        .with_file_suffix(config.file_suffix.as_str())
        .with_module_index(config.module_index)
        .with_jobs(config.jobs))
}

fn write_generated(dir: &Path, file: &GeneratedFile) -> Result<(), String> {
    let path = dir.join(&file.file_name);
    if fs::read_to_string(&path).is_ok_and(|existing| existing == file.contents) {
        debug!(file = %file.file_name, "unchanged");
        return Ok(());
    }
    fs::write(&path, &file.contents)
        .map_err(|e| format!("Failed to write '{}': {e}", path.display()))?;
    info!(file = %file.file_name, "wrote");
    Ok(())
}

/// Removes a file the previous run produced and this one did not.
///
/// Returns whether a file was removed. Names that are not plain file names
/// are skipped.
fn remove_stale(dir: &Path, file: &str) -> Result<bool, String> {
    if Path::new(file).file_name().and_then(|name| name.to_str()) != Some(file) {
        warn!(file, "manifest entry is not a plain file name, leaving it alone");
        return Ok(false);
    }
    let path = dir.join(file);
    match fs::remove_file(&path) {
        Ok(()) => {
            info!(file, "removed stale file");
            Ok(true)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(format!("Failed to remove '{}': {err}", path.display())),
    }
}
