//! Parameter schemas and the shared validation vocabulary.
//!
//! This crate is the core consumed by both the code generator and runtime
//! checking:
//!
//! - [`ScalarType`]: the closed catalog of eight parameter kinds with their
//!   representation types, conversions and built-in validators.
//! - [`validators`]: the built-in validation rules and the [`merge`]
//!   combinator.
//! - [`ParameterSpec`] / [`Schema`]: the declarative schema model, checked by
//!   [`validate_schema`] before use.
//! - [`ParamChecker`]: evaluates a schema against live input, reporting into
//!   [`Problems`].
//! - [`Lookup`], [`Resolver`], [`Whitelist`]: the capabilities supplied by
//!   the host.
//! - [`convert`]: conversion helpers called by generated accessors.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use paramspec_core::*;
//!
//! let schema = Schema::builder("Signup")
//!     .param(ParameterSpec::new("email").with_constraint(Constraint::EmailAddress))
//!     .param(
//!         ParameterSpec::new("password")
//!             .with_type(ScalarType::NonEmptyString)
//!             .with_validator("good_password"),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let registry = ValidatorRegistry::new().with("good_password", CommonPasswords);
//! let whitelist = ParamsWhitelist::new(["cachebuster"]);
//! let input = HashMap::from([
//!     ("email".to_string(), "someone@example.com".to_string()),
//!     ("password".to_string(), "letmein".to_string()),
//!     ("cachebuster".to_string(), "123".to_string()),
//! ]);
//!
//! let problems = check(&schema, &input, &whitelist, &registry).unwrap();
//! assert_eq!(problems.as_slice(), ["That password is too commonly used"]);
//! ```

mod check;
mod constraints;
pub mod convert;
mod custom;
mod error;
mod lookup;
mod package;
mod problems;
mod resolve;
mod schema;
mod types;
mod validate;
pub mod validators;

pub use check::{ParamChecker, Validatable, check};
pub use constraints::Constraint;
pub use custom::{CommonPasswords, StringLength};
pub use error::{ConversionError, ResolveError, SchemaError, ValidationFailed};
pub use lookup::Lookup;
pub use package::SchemaPackage;
pub use problems::Problems;
pub use resolve::{CachingResolver, ParamsWhitelist, Resolver, ValidatorRegistry, Whitelist};
pub use schema::{ParameterSpec, Schema, SchemaBuilder, SchemaDef};
pub use types::{SCHEMA_CONTRACT_VERSION, ScalarType, ScalarValue};
pub use validate::{RESERVED_CHARACTERS, is_identifier, validate_package, validate_schema};
pub use validators::{Validator, merge};

/// Re-exported for generated accessors.
pub use serde_json;
