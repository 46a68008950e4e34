//! The schema compiler.
//!
//! A checked [`Schema`] is lowered into a target-independent
//! [`AccessorDef`](ir::AccessorDef) and rendered by a [`Target`]. The Rust
//! target emits one `NameParams` type per schema with typed getters,
//! `from_lookup`, equality and hashing over the declared fields, a
//! `name = value` display form, `to_map`, and (depending on the schema flags)
//! `to_json`/`from_json`, `from_body`, a catch-all `get` and an
//! `impl paramspec_core::Validatable`.
//!
//! # Example
//!
//! ```
//! use paramspec_core::{ParameterSpec, ScalarType, Schema};
//!
//! let schema = Schema::builder("Search")
//!     .param(ParameterSpec::new("query").with_type(ScalarType::NonEmptyString))
//!     .param(ParameterSpec::new("limit").with_type(ScalarType::Integer).with_default("10"))
//!     .build()
//!     .unwrap();
//!
//! let file = paramspec_codegen::generate(&schema).unwrap();
//! assert_eq!(file.file_name, "search.rs");
//! assert!(file.source.contains("pub struct SearchParams {"));
//! assert!(file.source.contains("or_default(source, \"limit\", 10_i32)?"));
//! ```

mod error;
pub mod ir;
mod lower;
mod rust;
mod target;
mod writer;

use std::collections::HashMap;

use paramspec_core::{Schema, SchemaPackage, validate_package};
use tracing::debug;

pub use error::CodegenError;
pub use lower::{RESERVED_MEMBERS, lower, module_name, snake_case, upper_camel};
pub use rust::RustTarget;
pub use target::Target;

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the output directory.
    pub file_name: String,
    /// Source schema name, or `None` for an index file.
    pub origin: Option<String>,
    /// Generated type name, or `None` for an index file.
    pub type_name: Option<String>,
    /// The rendered source text.
    pub source: String,
}

/// Compiles one schema with the Rust target.
///
/// # Errors
///
/// See [`generate_with`].
pub fn generate(schema: &Schema) -> Result<GeneratedFile, CodegenError> {
    generate_with(&RustTarget, schema)
}

/// Compiles one schema with `target`.
///
/// # Errors
///
/// [`CodegenError::ReservedMember`] if a parameter name collides with a
/// generated member.
pub fn generate_with(target: &dyn Target, schema: &Schema) -> Result<GeneratedFile, CodegenError> {
    let def = lower(schema)?;
    Ok(GeneratedFile {
        file_name: target.file_name(&def),
        origin: Some(def.origin.clone()),
        type_name: Some(def.type_name.clone()),
        source: target.render(&def),
    })
}

/// Compiles every schema of a package plus the index file.
///
/// The package is checked first; nothing is rendered unless every schema
/// lowers successfully.
///
/// # Errors
///
/// The first package or schema error, a reserved member collision, or
/// [`CodegenError::ModuleCollision`] / [`CodegenError::TypeCollision`] if two
/// schema names map to the same module or type.
pub fn generate_package(
    target: &dyn Target,
    package: &SchemaPackage,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    if let Some(error) = validate_package(package).into_iter().next() {
        return Err(error.into());
    }

    let defs = package
        .schemas
        .iter()
        .map(lower)
        .collect::<Result<Vec<_>, _>>()?;

    let mut modules: HashMap<&str, &str> = HashMap::new();
    let mut types: HashMap<&str, &str> = HashMap::new();
    for def in &defs {
        if let Some(first) = modules.insert(&def.module_name, &def.origin) {
            return Err(CodegenError::ModuleCollision {
                first: first.to_string(),
                second: def.origin.clone(),
                module: def.module_name.clone(),
            });
        }
        if let Some(first) = types.insert(&def.type_name, &def.origin) {
            return Err(CodegenError::TypeCollision {
                first: first.to_string(),
                second: def.origin.clone(),
                type_name: def.type_name.clone(),
            });
        }
    }

    let mut files: Vec<GeneratedFile> = defs
        .iter()
        .map(|def| GeneratedFile {
            file_name: target.file_name(def),
            origin: Some(def.origin.clone()),
            type_name: Some(def.type_name.clone()),
            source: target.render(def),
        })
        .collect();
    files.push(GeneratedFile {
        file_name: target.index_file_name().to_string(),
        origin: None,
        type_name: None,
        source: target.render_index(&defs),
    });

    debug!(schemas = defs.len(), "generated package");
    Ok(files)
}

/// Compiles several schemas into a single Rust source, suitable for
/// `include!` from a build script's output directory.
///
/// # Errors
///
/// As [`generate_package`], minus the version check.
pub fn generate_combined(schemas: &[Schema]) -> Result<String, CodegenError> {
    let mut package = SchemaPackage::new("0.0.0", "");
    package.schemas = schemas.to_vec();
    let files = generate_package(&RustTarget, &package)?;
    let sources: Vec<&str> = files
        .iter()
        .filter(|file| file.origin.is_some())
        .map(|file| file.source.as_str())
        .collect();
    Ok(sources.join("\n"))
}
