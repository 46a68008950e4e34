//! Error types shared by schema construction, accessor construction and
//! validator resolution.
//!
//! Soft validation problems are never errors: they are collected into
//! [`Problems`](crate::Problems). The types here cover the hard failures that
//! abort an operation.

use thiserror::Error;

/// Schema-level errors.
///
/// Raised while building a [`Schema`](crate::Schema) or a
/// [`SchemaPackage`](crate::SchemaPackage); no validator runs against a
/// schema that produced one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Schema name is empty or whitespace-only.
    #[error("schema name cannot be empty")]
    EmptySchemaName,
    /// Schema name cannot be used to name a generated type.
    #[error("schema name is not a valid identifier: {0}")]
    InvalidSchemaName(String),
    /// A parameter name is empty or whitespace-only.
    #[error("empty parameter name")]
    EmptyName,
    /// A parameter name contains one of the reserved characters.
    #[error("parameter name '{name}' may not contain the character '{ch}'")]
    ReservedCharacter {
        /// Offending parameter name.
        name: String,
        /// First reserved character found in the name.
        ch: char,
    },
    /// A parameter name is not a valid bare identifier (or is a keyword).
    #[error("not a valid identifier: {0}")]
    InvalidIdentifier(String),
    /// Two parameters in the same schema share a name.
    #[error("duplicate parameter name '{0}'")]
    DuplicateName(String),
    /// A default value fails its scalar type's built-in validation.
    #[error("bad default value for {name}: {problem}")]
    InvalidDefault {
        /// Parameter carrying the default.
        name: String,
        /// Why the default was rejected.
        problem: String,
    },
    /// Package version string is empty.
    #[error("package version cannot be empty")]
    EmptyPackageVersion,
    /// Two schemas in the same package share a name.
    #[error("duplicate schema in package: {0}")]
    DuplicateSchema(String),
    /// A schema document could not be deserialized.
    #[error("malformed schema document: {0}")]
    Malformed(String),
}

/// Hard failures while constructing a generated accessor from raw input.
///
/// Distinct from [`Problems`](crate::Problems): a conversion error means no
/// accessor value exists at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// A required parameter without a default was absent.
    #[error("missing required parameter '{key}'")]
    Missing {
        /// Parameter name.
        key: String,
    },
    /// A present value could not be converted to its scalar type.
    #[error("parameter '{key}' is not a valid {expected}: '{raw}'")]
    Invalid {
        /// Parameter name.
        key: String,
        /// Human-readable name of the expected type.
        expected: &'static str,
        /// The raw value as received.
        raw: String,
    },
    /// A JSON body was not a JSON object.
    #[error("malformed JSON input: {0}")]
    Json(String),
}

/// Errors raised while obtaining or configuring validator instances.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No validator is registered under the identifier.
    #[error("no validator registered for '{0}'")]
    Unknown(String),
    /// Length bounds where the maximum does not exceed the minimum.
    #[error("max length {max} must be greater than min length {min}")]
    InvalidLengthBounds {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
}

/// Raised by [`Problems::ensure_empty`](crate::Problems::ensure_empty) when a
/// validation pass recorded at least one problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} parameter problem(s): {}", .problems.len(), .problems.join("; "))]
pub struct ValidationFailed {
    /// Every problem recorded, in order.
    pub problems: Vec<String>,
}
