//! Target-independent description of a generated accessor.
//!
//! Lowering resolves every schema-level decision (field order, how each
//! field is constructed, which optional members exist) so that renderers
//! only format.

use paramspec_core::{Constraint, ScalarType};

/// How a field obtains its value at construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldMode {
    /// Required without a default: absence fails construction.
    Required,
    /// A default is substituted when absent; the value always exists.
    Defaulted(DefaultLiteral),
    /// May be absent.
    Optional,
}

/// A default value, already converted to its scalar type.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultLiteral {
    Double(f64),
    Integer(i32),
    Long(i64),
    Boolean(bool),
    String(String),
}

/// One field of the accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub kind: ScalarType,
    pub mode: FieldMode,
    pub constraints: Vec<Constraint>,
    pub validators: Vec<String>,
}

impl FieldDef {
    /// Returns `true` if a value always exists after construction.
    pub fn always_present(&self) -> bool {
        !matches!(self.mode, FieldMode::Optional)
    }

    /// Returns `true` if the field takes part in the validation method.
    pub fn has_checks(&self) -> bool {
        !self.constraints.is_empty() || !self.validators.is_empty()
    }
}

/// The whole accessor: fields sorted by name plus the optional members the
/// schema flags switch on.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorDef {
    /// Name of the source schema.
    pub origin: String,
    /// Generated type name.
    pub type_name: String,
    /// Generated module (file stem) name.
    pub module_name: String,
    pub fields: Vec<FieldDef>,
    /// Capture undeclared keys and expose `get`.
    pub catch_all: bool,
    /// Emit the validation method.
    pub validation: bool,
    /// Emit `to_json` / `from_json`.
    pub json_output: bool,
    /// Emit `from_body`.
    pub from_body: bool,
    /// The schema serialized as JSON, embedded in the output.
    pub schema_json: String,
    /// SHA-256 of `schema_json`, lowercase hex.
    pub digest: String,
}

impl AccessorDef {
    /// Returns `true` if any field takes part in validation.
    pub fn has_checks(&self) -> bool {
        self.fields.iter().any(FieldDef::has_checks)
    }
}
