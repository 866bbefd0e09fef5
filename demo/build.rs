//! Renders the data-access modules for `models.toml` into `OUT_DIR`.

use std::error::Error;
use std::path::PathBuf;
use std::{env, fs};

use dalgen_codegen::{Generator, RenderOptions, Renderer};
use dalgen_core::derive_tables;
use dalgen_loader::SchemaFile;

const SCHEMA: &str = "models.toml";

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed={SCHEMA}");

    let schema = SchemaFile::load(SCHEMA)?;
    let tables = derive_tables(&schema.schema)?;
    let outcome = Generator::new(Renderer::new(RenderOptions::default())?)
        .with_module_index(false)
        .generate(&tables);

    if let Some(failure) = outcome.failures.first() {
        return Err(format!("{}: {}", failure.table, failure.error).into());
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    for file in &outcome.files {
        fs::write(out_dir.join(&file.file_name), &file.contents)?;
    }
    Ok(())
}
