//! The parameter schema model.
//!
//! A [`SchemaDef`] is the raw, serializable description of a parameter set.
//! A [`Schema`] is a `SchemaDef` that passed every correctness check; it is
//! immutable and can be shared freely between the code generator and the
//! runtime checker.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constraints::Constraint;
use crate::error::SchemaError;
use crate::types::ScalarType;
use crate::validate::validate_schema;

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One declared parameter.
///
/// # Examples
///
/// ```
/// use paramspec_core::{Constraint, ParameterSpec, ScalarType};
///
/// let count = ParameterSpec::new("count")
///     .with_type(ScalarType::Integer)
///     .with_default(" 5 ");
/// assert_eq!(count.default(), Some("5"));
/// assert!(count.required);
/// assert!(!count.effectively_required());
///
/// let email = ParameterSpec::new("email")
///     .optional()
///     .with_constraint(Constraint::EmailAddress)
///     .with_constraint(Constraint::EmailAddress);
/// assert_eq!(email.constraints.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name; also the generated field name.
    pub name: String,
    /// Scalar type of the value.
    #[serde(rename = "type", default)]
    pub kind: ScalarType,
    /// Whether the parameter must be present.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub required: bool,
    /// Raw default value substituted when the parameter is absent.
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Example value, for documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Named built-in constraints, in first-insertion order without
    /// duplicates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Custom validator identifiers, resolved through a
    /// [`Resolver`](crate::Resolver).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<String>,
}

impl ParameterSpec {
    /// Creates a required `String` parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ScalarType::String,
            required: true,
            default_value: None,
            example: None,
            constraints: Vec::new(),
            validators: Vec::new(),
        }
    }

    /// Sets the scalar type.
    pub fn with_type(mut self, kind: ScalarType) -> Self {
        self.kind = kind;
        self
    }

    /// Marks the parameter optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the example value.
    pub fn with_example(mut self, value: impl Into<String>) -> Self {
        self.example = Some(value.into());
        self
    }

    /// Adds a constraint unless it is already present.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        if !self.constraints.contains(&constraint) {
            self.constraints.push(constraint);
        }
        self
    }

    /// Adds a custom validator identifier.
    pub fn with_validator(mut self, id: impl Into<String>) -> Self {
        self.validators.push(id.into());
        self
    }

    /// The trimmed default value; an empty default counts as none.
    pub fn default(&self) -> Option<&str> {
        self.default_value
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Returns `true` if a non-empty default is declared.
    pub fn has_default(&self) -> bool {
        self.default().is_some()
    }

    /// Required and without a default: absence is a hard failure.
    pub fn effectively_required(&self) -> bool {
        self.required && !self.has_default()
    }

    /// Returns `true` if a value always exists after default substitution.
    pub fn always_present(&self) -> bool {
        self.required || self.has_default()
    }

    /// Returns `true` if any constraint or custom validator is declared.
    pub fn has_checks(&self) -> bool {
        !self.constraints.is_empty() || !self.validators.is_empty()
    }
}

/// The serializable description of a schema, before correctness checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDef {
    /// Schema name; names the generated accessor type.
    pub name: String,
    /// Declared parameters, in declaration order.
    #[serde(default)]
    pub params: Vec<ParameterSpec>,
    /// Accept input keys that are not declared.
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_unlisted_parameters: bool,
    /// Generate the `validate` method.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub generate_validation_code: bool,
    /// Generate `to_json` and `from_json`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub generate_json_output: bool,
    /// Parameters arrive as a JSON request body rather than a lookup.
    #[serde(default, skip_serializing_if = "is_false")]
    pub sourced_from_request_body: bool,
}

impl SchemaDef {
    /// Creates an empty definition with default flags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            allow_unlisted_parameters: false,
            generate_validation_code: true,
            generate_json_output: false,
            sourced_from_request_body: false,
        }
    }
}

/// A checked, immutable schema.
///
/// # Examples
///
/// ```
/// use paramspec_core::{ParameterSpec, ScalarType, Schema, SchemaError};
///
/// let schema = Schema::builder("Search")
///     .param(ParameterSpec::new("query").with_type(ScalarType::NonEmptyString))
///     .param(ParameterSpec::new("limit").with_type(ScalarType::Integer).with_default("10"))
///     .build()
///     .unwrap();
/// assert_eq!(schema.params().len(), 2);
/// assert!(schema.param("limit").is_some());
///
/// let duplicate = Schema::builder("Search")
///     .param(ParameterSpec::new("query"))
///     .param(ParameterSpec::new("query"))
///     .build();
/// assert_eq!(duplicate.unwrap_err(), SchemaError::DuplicateName("query".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SchemaDef", into = "SchemaDef")]
pub struct Schema {
    def: SchemaDef,
}

impl Schema {
    /// Starts building a schema named `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            def: SchemaDef::new(name),
        }
    }

    /// Checks `def` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found by
    /// [`validate_schema`](crate::validate_schema).
    pub fn new(def: SchemaDef) -> Result<Self, SchemaError> {
        if let Some(error) = validate_schema(&def).into_iter().next() {
            warn!(schema = %def.name, %error, "rejected schema");
            return Err(error);
        }
        Ok(Self { def })
    }

    /// Parses and checks a JSON schema document.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Malformed`] if the document does not deserialize,
    /// otherwise any correctness error.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let def: SchemaDef =
            serde_json::from_str(text).map_err(|e| SchemaError::Malformed(e.to_string()))?;
        Self::new(def)
    }

    /// Serializes to compact JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.def)
    }

    /// Schema name.
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Declared parameters in declaration order.
    pub fn params(&self) -> &[ParameterSpec] {
        &self.def.params
    }

    /// Looks up a declared parameter.
    pub fn param(&self, name: &str) -> Option<&ParameterSpec> {
        self.def.params.iter().find(|p| p.name == name)
    }

    /// Declared parameter names.
    pub fn declared_names(&self) -> BTreeSet<&str> {
        self.def.params.iter().map(|p| p.name.as_str()).collect()
    }

    /// See [`SchemaDef::allow_unlisted_parameters`].
    pub fn allow_unlisted_parameters(&self) -> bool {
        self.def.allow_unlisted_parameters
    }

    /// See [`SchemaDef::generate_validation_code`].
    pub fn generate_validation_code(&self) -> bool {
        self.def.generate_validation_code
    }

    /// See [`SchemaDef::generate_json_output`].
    pub fn generate_json_output(&self) -> bool {
        self.def.generate_json_output
    }

    /// See [`SchemaDef::sourced_from_request_body`].
    pub fn sourced_from_request_body(&self) -> bool {
        self.def.sourced_from_request_body
    }

    /// Borrows the underlying definition.
    pub fn def(&self) -> &SchemaDef {
        &self.def
    }
}

impl TryFrom<SchemaDef> for Schema {
    type Error = SchemaError;

    fn try_from(def: SchemaDef) -> Result<Self, Self::Error> {
        Self::new(def)
    }
}

impl From<Schema> for SchemaDef {
    fn from(schema: Schema) -> Self {
        schema.def
    }
}

/// Incremental [`Schema`] construction.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    def: SchemaDef,
}

impl SchemaBuilder {
    /// Appends a parameter.
    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.def.params.push(spec);
        self
    }

    /// Sets [`SchemaDef::allow_unlisted_parameters`].
    pub fn allow_unlisted_parameters(mut self, allow: bool) -> Self {
        self.def.allow_unlisted_parameters = allow;
        self
    }

    /// Sets [`SchemaDef::generate_validation_code`].
    pub fn generate_validation_code(mut self, generate: bool) -> Self {
        self.def.generate_validation_code = generate;
        self
    }

    /// Sets [`SchemaDef::generate_json_output`].
    pub fn generate_json_output(mut self, generate: bool) -> Self {
        self.def.generate_json_output = generate;
        self
    }

    /// Sets [`SchemaDef::sourced_from_request_body`].
    pub fn sourced_from_request_body(mut self, from_body: bool) -> Self {
        self.def.sourced_from_request_body = from_body;
        self
    }

    /// Checks and freezes the schema.
    ///
    /// # Errors
    ///
    /// The first [`SchemaError`] found.
    pub fn build(self) -> Result<Schema, SchemaError> {
        Schema::new(self.def)
    }
}
