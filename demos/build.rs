//! Compiles every schema under `schemas/` into `$OUT_DIR/params.rs`.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use paramspec_core::Schema;

fn main() -> Result<(), Box<dyn Error>> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("schemas");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", dir.display());

    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    paths.retain(|p| p.extension().is_some_and(|ext| ext == "json"));
    paths.sort();

    let mut schemas = Vec::with_capacity(paths.len());
    for path in &paths {
        println!("cargo:rerun-if-changed={}", path.display());
        let text = fs::read_to_string(path)?;
        let schema = Schema::from_json(&text)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        schemas.push(schema);
    }

    let source = paramspec_codegen::generate_combined(&schemas)?;
    let out = PathBuf::from(std::env::var("OUT_DIR")?).join("params.rs");
    fs::write(out, source)?;
    Ok(())
}
