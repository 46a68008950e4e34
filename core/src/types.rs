//! The scalar type catalog.
//!
//! Parameters are flat, string-keyed scalars of one of eight kinds. Each
//! kind maps to a representation type in generated code, a conversion from
//! the raw string, and a built-in validator. The mappings are exhaustive
//! `match`es with no fallback arm, so adding a kind without updating every
//! mapping fails to compile.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::convert::FromParam;
use crate::error::ConversionError;
use crate::validators::{self, Validator};

/// Version of the schema document format (semver).
///
/// Embedded in every [`SchemaPackage`](crate::SchemaPackage) so that
/// consumers can detect incompatible documents.
pub const SCHEMA_CONTRACT_VERSION: &str = "1.0.0";

/// The closed set of parameter types.
///
/// # Examples
///
/// ```
/// use paramspec_core::ScalarType;
///
/// assert_eq!(ScalarType::default(), ScalarType::String);
/// assert!(ScalarType::NonNegativeLong.is_numeric());
/// assert!(ScalarType::NonEmptyString.is_string());
/// assert_eq!(ScalarType::Integer.representation(true, true), "i32");
/// assert_eq!(ScalarType::Integer.representation(false, true), "Option<i32>");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// A floating-point number, `f64`.
    Double,
    /// A 32-bit signed integer, `i32`.
    Integer,
    /// A 64-bit signed integer, `i64`.
    Long,
    /// A non-negative integer, represented as `i32`.
    NonNegativeInteger,
    /// A non-negative long, represented as `i64`.
    NonNegativeLong,
    /// `true` or `false`, case-insensitively.
    Boolean,
    /// A string that is not empty after trimming.
    NonEmptyString,
    /// Any string (the default).
    #[default]
    String,
}

impl ScalarType {
    /// Every scalar kind, in declaration order.
    pub const ALL: [ScalarType; 8] = [
        ScalarType::Double,
        ScalarType::Integer,
        ScalarType::Long,
        ScalarType::NonNegativeInteger,
        ScalarType::NonNegativeLong,
        ScalarType::Boolean,
        ScalarType::NonEmptyString,
        ScalarType::String,
    ];

    /// Returns `true` for the five numeric kinds.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ScalarType::Double
                | ScalarType::Integer
                | ScalarType::Long
                | ScalarType::NonNegativeInteger
                | ScalarType::NonNegativeLong
        )
    }

    /// Returns `true` for `String` and `NonEmptyString`.
    pub fn is_string(self) -> bool {
        matches!(self, ScalarType::String | ScalarType::NonEmptyString)
    }

    /// Returns `true` if values of this kind are `Copy` in generated code.
    pub fn is_copy(self) -> bool {
        !self.is_string()
    }

    /// The Rust type holding a value of this kind.
    pub fn rust_type(self) -> &'static str {
        match self {
            ScalarType::Double => "f64",
            ScalarType::Integer | ScalarType::NonNegativeInteger => "i32",
            ScalarType::Long | ScalarType::NonNegativeLong => "i64",
            ScalarType::Boolean => "bool",
            ScalarType::NonEmptyString | ScalarType::String => "String",
        }
    }

    /// The representation type for a field of this kind.
    ///
    /// Required fields use the bare type. Optional fields use `Option<T>`
    /// when `wrap_optional_as_container` is set, otherwise the bare type for
    /// positions where absence is already expressed by the surrounding
    /// context (such as `Some(value)` patterns).
    pub fn representation(self, required: bool, wrap_optional_as_container: bool) -> String {
        let base = self.rust_type();
        if required || !wrap_optional_as_container {
            base.to_string()
        } else {
            format!("Option<{base}>")
        }
    }

    /// Human-readable type name used in conversion errors.
    pub fn expected(self) -> &'static str {
        match self {
            ScalarType::Double => f64::EXPECTED,
            ScalarType::Integer | ScalarType::NonNegativeInteger => i32::EXPECTED,
            ScalarType::Long | ScalarType::NonNegativeLong => i64::EXPECTED,
            ScalarType::Boolean => bool::EXPECTED,
            ScalarType::NonEmptyString | ScalarType::String => String::EXPECTED,
        }
    }

    /// Converts a raw string to a value of this kind.
    ///
    /// Conversion only parses; range and emptiness rules are the business of
    /// [`builtin_validator`](ScalarType::builtin_validator).
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Invalid`] if `raw` does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use paramspec_core::{ScalarType, ScalarValue};
    ///
    /// assert_eq!(ScalarType::Long.convert("n", "42").unwrap(), ScalarValue::Long(42));
    /// assert!(ScalarType::Integer.convert("n", "4x").is_err());
    /// ```
    pub fn convert(self, key: &str, raw: &str) -> Result<ScalarValue, ConversionError> {
        let invalid = || ConversionError::Invalid {
            key: key.to_string(),
            expected: self.expected(),
            raw: raw.to_string(),
        };
        let value = match self {
            ScalarType::Double => ScalarValue::Double(f64::from_param(raw).ok_or_else(invalid)?),
            ScalarType::Integer | ScalarType::NonNegativeInteger => {
                ScalarValue::Integer(i32::from_param(raw).ok_or_else(invalid)?)
            }
            ScalarType::Long | ScalarType::NonNegativeLong => {
                ScalarValue::Long(i64::from_param(raw).ok_or_else(invalid)?)
            }
            ScalarType::Boolean => ScalarValue::Boolean(bool::from_param(raw).ok_or_else(invalid)?),
            ScalarType::NonEmptyString | ScalarType::String => ScalarValue::String(raw.to_string()),
        };
        Ok(value)
    }

    /// The built-in validator for this kind.
    ///
    /// Both non-negative kinds share the 32-bit-bounded non-negative integer
    /// validator.
    pub fn builtin_validator(self) -> &'static dyn Validator {
        match self {
            ScalarType::Double => &validators::NUMBER,
            ScalarType::Integer => &validators::INTEGER,
            ScalarType::Long => &validators::LONG,
            ScalarType::NonNegativeInteger | ScalarType::NonNegativeLong => {
                &validators::NON_NEGATIVE_INTEGER
            }
            ScalarType::Boolean => &validators::BOOLEAN,
            ScalarType::NonEmptyString => &validators::NON_EMPTY,
            ScalarType::String => &validators::NO_OP,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Double => "double",
            ScalarType::Integer => "integer",
            ScalarType::Long => "long",
            ScalarType::NonNegativeInteger => "non_negative_integer",
            ScalarType::NonNegativeLong => "non_negative_long",
            ScalarType::Boolean => "boolean",
            ScalarType::NonEmptyString => "non_empty_string",
            ScalarType::String => "string",
        };
        f.write_str(name)
    }
}

/// A converted scalar value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// `Double`.
    Double(f64),
    /// `Integer` and `NonNegativeInteger`.
    Integer(i32),
    /// `Long` and `NonNegativeLong`.
    Long(i64),
    /// `Boolean`.
    Boolean(bool),
    /// `String` and `NonEmptyString`.
    String(String),
}

impl ScalarValue {
    /// Converts to a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ScalarValue::Double(v) => serde_json::Value::from(*v),
            ScalarValue::Integer(v) => serde_json::Value::from(*v),
            ScalarValue::Long(v) => serde_json::Value::from(*v),
            ScalarValue::Boolean(v) => serde_json::Value::from(*v),
            ScalarValue::String(v) => serde_json::Value::from(v.clone()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Double(v) => write!(f, "{v}"),
            ScalarValue::Integer(v) => write!(f, "{v}"),
            ScalarValue::Long(v) => write!(f, "{v}"),
            ScalarValue::Boolean(v) => write!(f, "{v}"),
            ScalarValue::String(v) => f.write_str(v),
        }
    }
}
