use paramspec_core::{ParameterSpec, ScalarValue, Schema, SchemaError, is_identifier};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::CodegenError;
use crate::ir::{AccessorDef, DefaultLiteral, FieldDef, FieldMode};

/// Member names emitted on every accessor; parameters may not reuse them.
pub const RESERVED_MEMBERS: &[&str] = &[
    "get",
    "validate",
    "to_map",
    "to_json",
    "from_lookup",
    "from_json",
    "from_body",
    "schema",
    "unlisted",
    "clone",
    "eq",
    "ne",
    "hash",
    "fmt",
    "to_string",
    "ORIGIN",
    "SCHEMA_JSON",
    "DECLARED",
];

/// Lowers a checked schema into the accessor IR.
///
/// Fields are sorted by name so that output is independent of declaration
/// order.
///
/// # Errors
///
/// [`CodegenError::ReservedMember`] if a parameter name collides with a
/// generated member.
pub fn lower(schema: &Schema) -> Result<AccessorDef, CodegenError> {
    if let Some(spec) = schema
        .params()
        .iter()
        .find(|p| RESERVED_MEMBERS.contains(&p.name.as_str()))
    {
        return Err(CodegenError::ReservedMember {
            schema: schema.name().to_string(),
            param: spec.name.clone(),
        });
    }

    let mut fields = schema
        .params()
        .iter()
        .map(lower_field)
        .collect::<Result<Vec<_>, _>>()?;
    fields.sort_by(|a, b| a.name.cmp(&b.name));

    let schema_json = schema.to_json().map_err(|e| CodegenError::Serialize {
        schema: schema.name().to_string(),
        message: e.to_string(),
    })?;
    let digest = format!("{:x}", Sha256::digest(schema_json.as_bytes()));

    let def = AccessorDef {
        origin: schema.name().to_string(),
        type_name: format!("{}Params", upper_camel(schema.name())),
        module_name: module_name(schema.name()),
        fields,
        catch_all: schema.allow_unlisted_parameters(),
        validation: schema.generate_validation_code(),
        json_output: schema.generate_json_output(),
        from_body: schema.sourced_from_request_body(),
        schema_json,
        digest,
    };
    debug!(
        schema = %def.origin,
        type_name = %def.type_name,
        fields = def.fields.len(),
        "lowered schema"
    );
    Ok(def)
}

fn lower_field(spec: &ParameterSpec) -> Result<FieldDef, CodegenError> {
    let mode = match spec.default() {
        Some(raw) => {
            let value = spec.kind.convert(&spec.name, raw).map_err(|e| {
                SchemaError::InvalidDefault {
                    name: spec.name.clone(),
                    problem: e.to_string(),
                }
            })?;
            FieldMode::Defaulted(literal(value))
        }
        None if spec.required => FieldMode::Required,
        None => FieldMode::Optional,
    };
    Ok(FieldDef {
        name: spec.name.clone(),
        kind: spec.kind,
        mode,
        constraints: spec.constraints.clone(),
        validators: spec.validators.clone(),
    })
}

fn literal(value: ScalarValue) -> DefaultLiteral {
    match value {
        ScalarValue::Double(v) => DefaultLiteral::Double(v),
        ScalarValue::Integer(v) => DefaultLiteral::Integer(v),
        ScalarValue::Long(v) => DefaultLiteral::Long(v),
        ScalarValue::Boolean(v) => DefaultLiteral::Boolean(v),
        ScalarValue::String(v) => DefaultLiteral::String(v),
    }
}

/// `search_query` and `searchQuery` both become `SearchQuery`.
pub fn upper_camel(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Module name for a schema: its snake case, suffixed with `_params` when
/// that would be a keyword (`Type` becomes `type_params`).
pub fn module_name(schema_name: &str) -> String {
    let module = snake_case(schema_name);
    if is_identifier(&module) {
        module
    } else {
        format!("{module}_params")
    }
}

/// `SearchQuery` becomes `search_query`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}
