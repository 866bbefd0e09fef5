use std::path::Path;

use dalgen_core::{ColumnKind, ColumnType, derive_tables};
use dalgen_loader::{GenerationManifest, GeneratorConfig, LoaderError, MANIFEST_FILE, SchemaFile};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const MODELS: &str = r#"
[users]
id = "text"
password_hash = "text"
is_admin = "bool"

[contests]
id = "int"
name = "text"
start_time = "timestamp"
end_time = "timestamp"

[problems]
id = "int"
contest_id = "int"
name = "text"

[problem_results]
user_id = "text"
problem_id = "int"
score = "float"
best_submission_id = "int?"
"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Schema loading
// ---------------------------------------------------------------------------

#[test]
fn test_loaded_schema_derives_expected_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "models.toml", MODELS);

    let file = SchemaFile::load(&path).unwrap();
    let tables = derive_tables(&file.schema).unwrap();
    let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["contests", "problem_results", "problems", "users"]);

    let results = tables.iter().find(|t| t.name == "problem_results").unwrap();
    assert!(results.upsert_strategy());
    assert_eq!(
        dalgen_core::sorted_names(&results.primary_keys),
        vec!["problem_id", "user_id"]
    );
    assert_eq!(
        results.fields["best_submission_id"],
        ColumnType::nullable(ColumnKind::Int)
    );
}

#[test]
fn test_malformed_schema_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "models.toml", "[users]\nid = \"text\"\nname = \n");

    let err = SchemaFile::load(&path).unwrap_err();
    assert!(matches!(err, LoaderError::TomlError(_)));
}

// ---------------------------------------------------------------------------
// Config + manifest
// ---------------------------------------------------------------------------

#[test]
fn test_config_points_at_schema() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "schema/models.toml", MODELS);
    let config_path = write(
        dir.path(),
        "dalgen.yaml",
        "schema: schema/models.toml\noutput: out\n",
    );

    let config = GeneratorConfig::load(&config_path).unwrap();
    let file = SchemaFile::load(&config.schema).unwrap();
    assert_eq!(file.schema.len(), 4);
    assert_eq!(config.output, dir.path().join("out"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write(dir.path(), "dalgen.yaml", "runtime_crate: \"not a path\"\n");

    let err = GeneratorConfig::load(&config_path).unwrap_err();
    assert!(matches!(err, LoaderError::InvalidConfig(_)));
}

#[test]
fn test_manifest_tracks_written_files() {
    let dir = tempfile::tempdir().unwrap();
    let file = SchemaFile::parse(MODELS).unwrap();

    let mut manifest = GenerationManifest::new("0.1.0", file.checksum());
    for name in file.schema.table_names() {
        let contents = format!("// {name}\n");
        let file_name = format!("{name}_generated.rs");
        let path = write(dir.path(), &file_name, &contents);
        manifest.record_table(name, file_name, &contents);
        assert_eq!(
            GenerationManifest::checksum(&std::fs::read(&path).unwrap()),
            manifest.tables[name].checksum
        );
    }
    manifest.save_to_dir(dir.path()).unwrap();
    assert!(dir.path().join(MANIFEST_FILE).exists());

    let loaded = GenerationManifest::load_from_dir(dir.path())
        .unwrap()
        .unwrap();
    assert_eq!(loaded.schema_checksum, file.checksum());
    assert_eq!(loaded.files().len(), 4);
}
