//! Schema and input file loading.
//!
//! Schema files are JSON or YAML (chosen by extension) and hold either one
//! schema or a whole package (any document with a `schemas` key).

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use paramspec_core::{Schema, SchemaDef, SchemaError, SchemaPackage, validate_package};
use rayon::prelude::*;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

/// Failures while reading configuration, schema or input files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Filesystem I/O failure.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON parsing failure.
    #[error("invalid JSON in '{}': {message}", path.display())]
    Json { path: PathBuf, message: String },
    /// YAML parsing failure.
    #[error("invalid YAML in '{}': {message}", path.display())]
    Yaml { path: PathBuf, message: String },
    /// A schema or package failed its correctness checks.
    #[error("schema validation failed for '{}': {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
    /// Invalid or missing input (non-existent path, wrong extension).
    #[error("{0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Option<Format> {
    match path.extension().and_then(OsStr::to_str) {
        Some("json") => Some(Format::Json),
        Some("yaml" | "yml") => Some(Format::Yaml),
        _ => None,
    }
}

/// Expands files and directories into a sorted list of schema files.
///
/// # Errors
///
/// [`LoadError::InvalidInput`] for an empty list, a missing path or a file
/// that is neither JSON nor YAML.
pub fn collect_schema_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, LoadError> {
    if inputs.is_empty() {
        return Err(LoadError::InvalidInput(
            "No schema paths were provided".to_string(),
        ));
    }

    let mut paths = BTreeSet::new();
    for input in inputs {
        if input.is_dir() {
            let entries = fs::read_dir(input).map_err(|source| LoadError::Io {
                path: input.clone(),
                source,
            })?;
            for entry in entries {
                let entry = entry.map_err(|source| LoadError::Io {
                    path: input.clone(),
                    source,
                })?;
                let path = entry.path();
                if path.is_file() && format_of(&path).is_some() {
                    paths.insert(path);
                }
            }
            continue;
        }

        if input.is_file() {
            if format_of(input).is_none() {
                return Err(LoadError::InvalidInput(format!(
                    "Schema file '{}' must end in .json, .yaml or .yml",
                    input.display()
                )));
            }
            paths.insert(input.clone());
            continue;
        }

        return Err(LoadError::InvalidInput(format!(
            "Schema path '{}' does not exist",
            input.display()
        )));
    }

    Ok(paths.into_iter().collect())
}

/// Reads a JSON or YAML document into a JSON value.
///
/// # Errors
///
/// I/O or parse failures, or an unsupported extension.
pub fn read_document(path: &Path) -> Result<Value, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match format_of(path) {
        Some(Format::Json) => serde_json::from_str(&raw).map_err(|e| LoadError::Json {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        Some(Format::Yaml) => serde_yaml::from_str(&raw).map_err(|e| LoadError::Yaml {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        None => Err(LoadError::InvalidInput(format!(
            "'{}' must end in .json, .yaml or .yml",
            path.display()
        ))),
    }
}

/// Loads every schema in one file.
///
/// # Errors
///
/// Read/parse failures and schema correctness errors.
pub fn load_schema_file(path: &Path) -> Result<Vec<Schema>, LoadError> {
    let document = read_document(path)?;
    let schema_error = |source: SchemaError| LoadError::Schema {
        path: path.to_path_buf(),
        source,
    };
    let malformed = |e: serde_json::Error| schema_error(SchemaError::Malformed(e.to_string()));

    let is_package = document.as_object().is_some_and(|o| o.contains_key("schemas"));
    let schemas = if is_package {
        let package: SchemaPackage = serde_json::from_value(document).map_err(malformed)?;
        if let Some(error) = validate_package(&package).into_iter().next() {
            return Err(schema_error(error));
        }
        package.schemas
    } else {
        let def: SchemaDef = serde_json::from_value(document).map_err(malformed)?;
        vec![Schema::new(def).map_err(schema_error)?]
    };
    debug!(path = %path.display(), schemas = schemas.len(), "loaded schema file");
    Ok(schemas)
}

/// Loads and checks every schema in `paths`, reading files in parallel.
///
/// # Errors
///
/// The first failing file, in path order.
pub fn load_schemas(paths: &[PathBuf]) -> Result<Vec<Schema>, LoadError> {
    let loaded: Vec<Result<Vec<Schema>, LoadError>> =
        paths.par_iter().map(|path| load_schema_file(path)).collect();
    let mut schemas = Vec::new();
    for result in loaded {
        schemas.extend(result?);
    }
    Ok(schemas)
}

/// Bundles schema files into a checked [`SchemaPackage`].
///
/// The bundle hash is the SHA-256 of the serialized schema list.
///
/// # Errors
///
/// Load failures, or a package-level error such as a duplicate schema name.
pub fn bundle_schema_files(
    paths: &[PathBuf],
    version: &str,
    name: Option<String>,
    description: Option<String>,
) -> Result<SchemaPackage, LoadError> {
    let schemas = load_schemas(paths)?;

    let mut package = SchemaPackage::new(version, Utc::now().to_rfc3339());
    package.name = name;
    package.description = description;
    package.schemas = schemas;

    if let Some(error) = validate_package(&package).into_iter().next() {
        return Err(LoadError::InvalidInput(format!(
            "Schema package validation failed: {error}"
        )));
    }

    let serialized = serde_json::to_vec(&package.schemas).map_err(|e| {
        LoadError::InvalidInput(format!("Failed to serialize schemas: {e}"))
    })?;
    package.bundle_hash = Some(format!("{:x}", Sha256::digest(&serialized)));
    Ok(package)
}

/// Reads an input document that must be a flat object.
///
/// # Errors
///
/// Read/parse failures, or [`LoadError::InvalidInput`] if the document is
/// not an object.
pub fn load_input(path: &Path) -> Result<Map<String, Value>, LoadError> {
    match read_document(path)? {
        Value::Object(map) => Ok(map),
        _ => Err(LoadError::InvalidInput(format!(
            "Input '{}' must be a mapping of parameter names to values",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_single_schema_yaml_and_package_json() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "login.yaml",
            "name: Login\nparams:\n  - name: user\n  - name: age\n    type: integer\n    required: false\n",
        );
        write(
            dir.path(),
            "pkg.json",
            r#"{"version":"1.0.0","schemas":[{"name":"A"},{"name":"B"}]}"#,
        );
        write(dir.path(), "notes.txt", "ignored");

        let paths = collect_schema_paths(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(paths.len(), 2);

        let schemas = load_schemas(&paths).unwrap();
        let names: Vec<_> = schemas.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["Login", "A", "B"]);
        assert!(!schemas[0].param("age").unwrap().required);
    }

    #[test]
    fn test_bad_schema_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "bad.json",
            r#"{"name":"Bad","params":[{"name":"a.b"}]}"#,
        );
        let err = load_schema_file(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bad.json"));
        assert!(message.contains("may not contain the character '.'"));
    }

    #[test]
    fn test_wrong_extension_and_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let txt = write(dir.path(), "schema.txt", "{}");
        assert!(matches!(
            collect_schema_paths(&[txt]),
            Err(LoadError::InvalidInput(_))
        ));
        assert!(matches!(
            collect_schema_paths(&[dir.path().join("missing.json")]),
            Err(LoadError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bundle_sets_hash_and_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.json", r#"{"name":"A"}"#);
        let package = bundle_schema_files(&[a.clone()], "1.0.0", None, None).unwrap();
        assert_eq!(package.bundle_hash.as_deref().map(str::len), Some(64));

        let again = write(dir.path(), "a2.json", r#"{"name":"A"}"#);
        let err = bundle_schema_files(&[a, again], "1.0.0", None, None).unwrap_err();
        assert!(err.to_string().contains("duplicate schema in package: A"));
    }
}
