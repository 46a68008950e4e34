//! Schema and package correctness checks.
//!
//! These run before any validator touches live input: a schema that fails
//! here never becomes a [`Schema`](crate::Schema).
//!
//! # Examples
//!
//! ```
//! use paramspec_core::*;
//!
//! let mut def = SchemaDef::new("Search");
//! def.params.push(ParameterSpec::new("query"));
//! assert!(validate_schema(&def).is_empty());
//!
//! def.params.push(ParameterSpec::new("a.b"));
//! def.params.push(ParameterSpec::new("query"));
//! assert_eq!(
//!     validate_schema(&def),
//!     vec![
//!         SchemaError::ReservedCharacter { name: "a.b".into(), ch: '.' },
//!         SchemaError::DuplicateName("query".into()),
//!     ]
//! );
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::SchemaError;
use crate::problems::Problems;
use crate::schema::{ParameterSpec, SchemaDef};
use crate::SchemaPackage;

/// Characters that may never appear in a parameter name.
pub const RESERVED_CHARACTERS: &[char] = &[
    ';', ',', '.', '/', '*', '!', '@', '&', '^', '\\', '<', '>', '?', '\'', '"', '[', ']', '{',
    '}', '-', '=', '+', ')', '(',
];

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex must compile"));

/// Returns `true` if `name` can be used as a bare identifier in generated
/// code.
pub fn is_identifier(name: &str) -> bool {
    name != "_" && IDENTIFIER.is_match(name) && !KEYWORDS.contains(&name)
}

/// Validates a schema package.
///
/// Checks for an empty version string and duplicate schema names, then
/// validates each schema. Stops at the first failing schema.
///
/// # Examples
///
/// ```
/// use paramspec_core::*;
///
/// let schema = Schema::builder("Search").build().unwrap();
/// let mut package = SchemaPackage::new("1.0.0", "2024-01-01T00:00:00Z");
/// package.schemas.push(schema.clone());
/// assert!(validate_package(&package).is_empty());
///
/// package.schemas.push(schema);
/// let errors = validate_package(&package);
/// assert_eq!(errors, vec![SchemaError::DuplicateSchema("Search".into())]);
/// ```
pub fn validate_package(package: &SchemaPackage) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    if package.version.trim().is_empty() {
        errors.push(SchemaError::EmptyPackageVersion);
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for schema in &package.schemas {
        let name = schema.name();
        if !seen.insert(name) {
            errors.push(SchemaError::DuplicateSchema(name.to_string()));
            return errors;
        }
        errors.extend(validate_schema(schema.def()));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

/// Validates a schema definition, returning every error found.
///
/// Per parameter, in declaration order: empty name, reserved character,
/// invalid identifier, duplicate name, bad default value. A required
/// parameter that also carries a default is accepted.
pub fn validate_schema(def: &SchemaDef) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    let name = def.name.trim();
    if name.is_empty() {
        errors.push(SchemaError::EmptySchemaName);
        return errors;
    }
    if !is_identifier(name) {
        errors.push(SchemaError::InvalidSchemaName(def.name.clone()));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for spec in &def.params {
        if let Some(error) = check_name(spec) {
            errors.push(error);
            continue;
        }
        if !seen.insert(spec.name.as_str()) {
            errors.push(SchemaError::DuplicateName(spec.name.clone()));
            continue;
        }
        if let Some(error) = check_default(spec) {
            errors.push(error);
        }
    }

    errors
}

fn check_name(spec: &ParameterSpec) -> Option<SchemaError> {
    let name = spec.name.as_str();
    if name.trim().is_empty() {
        return Some(SchemaError::EmptyName);
    }
    if let Some(ch) = name.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
        return Some(SchemaError::ReservedCharacter {
            name: name.to_string(),
            ch,
        });
    }
    if !is_identifier(name) {
        return Some(SchemaError::InvalidIdentifier(name.to_string()));
    }
    None
}

fn check_default(spec: &ParameterSpec) -> Option<SchemaError> {
    let default = spec.default()?;
    let mut problems = Problems::new();
    spec.kind
        .builtin_validator()
        .validate(&mut problems, &spec.name, Some(default));
    let problem = match problems.lead() {
        Some(problem) => problem.to_string(),
        None => spec.kind.convert(&spec.name, default).err()?.to_string(),
    };
    Some(SchemaError::InvalidDefault {
        name: spec.name.clone(),
        problem,
    })
}
