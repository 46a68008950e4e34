//! Typed conversion of raw parameter strings.
//!
//! Generated constructors call [`required`], [`optional`] and [`or_default`]
//! once per field. These only parse; range and emptiness rules belong to the
//! validators and are reported through [`Problems`](crate::Problems).

use serde_json::{Map, Value};

use crate::error::ConversionError;
use crate::lookup::Lookup;

/// A scalar that can be parsed from a raw parameter string.
pub trait FromParam: Sized {
    /// Human-readable type name used in [`ConversionError::Invalid`].
    const EXPECTED: &'static str;

    /// Parses `raw`, returning `None` if it is not a valid value.
    fn from_param(raw: &str) -> Option<Self>;
}

impl FromParam for f64 {
    const EXPECTED: &'static str = "number";

    fn from_param(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl FromParam for i32 {
    const EXPECTED: &'static str = "32-bit integer";

    fn from_param(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl FromParam for i64 {
    const EXPECTED: &'static str = "64-bit integer";

    fn from_param(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl FromParam for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_param(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl FromParam for String {
    const EXPECTED: &'static str = "string";

    fn from_param(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

fn parse<T: FromParam>(key: &str, raw: &str) -> Result<T, ConversionError> {
    T::from_param(raw).ok_or_else(|| ConversionError::Invalid {
        key: key.to_string(),
        expected: T::EXPECTED,
        raw: raw.to_string(),
    })
}

/// Converts a parameter that must be present.
///
/// # Errors
///
/// [`ConversionError::Missing`] if `key` is absent, or
/// [`ConversionError::Invalid`] if the value does not parse.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use paramspec_core::convert;
///
/// let input = HashMap::from([("count".to_string(), "12".to_string())]);
/// let count: i32 = convert::required(&input, "count").unwrap();
/// assert_eq!(count, 12);
/// assert!(convert::required::<i32, _>(&input, "other").is_err());
/// ```
pub fn required<T, L>(source: &L, key: &str) -> Result<T, ConversionError>
where
    T: FromParam,
    L: Lookup + ?Sized,
{
    match source.get(key) {
        Some(raw) => parse(key, &raw),
        None => Err(ConversionError::Missing {
            key: key.to_string(),
        }),
    }
}

/// Converts a parameter that may be absent.
///
/// # Errors
///
/// [`ConversionError::Invalid`] if the value is present but does not parse.
pub fn optional<T, L>(source: &L, key: &str) -> Result<Option<T>, ConversionError>
where
    T: FromParam,
    L: Lookup + ?Sized,
{
    source.get(key).map(|raw| parse(key, &raw)).transpose()
}

/// Converts a parameter, substituting `default` when it is absent.
///
/// # Errors
///
/// [`ConversionError::Invalid`] if the value is present but does not parse.
pub fn or_default<T, L>(source: &L, key: &str, default: T) -> Result<T, ConversionError>
where
    T: FromParam,
    L: Lookup + ?Sized,
{
    Ok(optional(source, key)?.unwrap_or(default))
}

/// Parses a JSON document that must be an object.
///
/// # Errors
///
/// [`ConversionError::Json`] if the text is not valid JSON or not an object.
pub fn json_object(text: &str) -> Result<Map<String, Value>, ConversionError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ConversionError::Json(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(e) => Err(ConversionError::Json(e.to_string())),
    }
}

/// Parses a request body that must be a UTF-8 JSON object.
///
/// # Errors
///
/// [`ConversionError::Json`] if the body is not UTF-8 or not a JSON object.
pub fn json_body(body: &[u8]) -> Result<Map<String, Value>, ConversionError> {
    let text = std::str::from_utf8(body).map_err(|e| ConversionError::Json(e.to_string()))?;
    json_object(text)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
