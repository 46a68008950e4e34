//! The Rust back end.
//!
//! Generated code refers to the runtime only through absolute
//! `::paramspec_core` paths so it can be included anywhere.

use paramspec_core::ScalarType;

use crate::ir::{AccessorDef, DefaultLiteral, FieldDef, FieldMode};
use crate::target::Target;
use crate::writer::SourceWriter;

const CORE: &str = "::paramspec_core";
const JSON: &str = "::paramspec_core::serde_json";

/// Renders accessors as Rust source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustTarget;

impl Target for RustTarget {
    fn file_name(&self, def: &AccessorDef) -> String {
        format!("{}.rs", def.module_name)
    }

    fn index_file_name(&self) -> &'static str {
        "mod.rs"
    }

    fn render(&self, def: &AccessorDef) -> String {
        let mut w = SourceWriter::new();
        w.line(format!(
            "// @generated by paramspec-codegen from schema `{}`. Do not edit.",
            def.origin
        ));
        w.line(format!("// schema-sha256: {}", def.digest));
        w.blank();
        render_struct(&mut w, def);
        w.blank();
        render_inherent(&mut w, def);
        w.blank();
        render_eq(&mut w, def);
        w.blank();
        render_hash(&mut w, def);
        w.blank();
        render_display(&mut w, def);
        if def.validation {
            w.blank();
            render_validatable(&mut w, def);
        }
        w.finish()
    }

    fn render_index(&self, defs: &[AccessorDef]) -> String {
        let mut w = SourceWriter::new();
        w.line("// @generated by paramspec-codegen. Do not edit.");
        w.blank();
        for def in defs {
            w.line(format!("pub mod {};", def.module_name));
        }
        if !defs.is_empty() {
            w.blank();
        }
        for def in defs {
            w.line(format!("pub use {}::{};", def.module_name, def.type_name));
        }
        w.blank();
        w.line("/// Every generated accessor as `(schema name, type name)`.");
        w.open("pub const ACCESSORS: &[(&str, &str)] = &[");
        for def in defs {
            w.line(format!("({:?}, {:?}),", def.origin, def.type_name));
        }
        w.close("];");
        w.finish()
    }
}

fn field_type(field: &FieldDef) -> String {
    field.kind.representation(field.always_present(), true)
}

fn default_expr(literal: &DefaultLiteral) -> String {
    match literal {
        DefaultLiteral::Double(v) => format!("{v:?}_f64"),
        DefaultLiteral::Integer(v) => format!("{v}_i32"),
        DefaultLiteral::Long(v) => format!("{v}_i64"),
        DefaultLiteral::Boolean(v) => v.to_string(),
        DefaultLiteral::String(v) => format!("String::from({v:?})"),
    }
}

/// JSON value expression for a field value; `place` is an owned field
/// access or, with `by_ref`, a reference bound by `if let`.
fn json_value(kind: ScalarType, place: &str, by_ref: bool) -> String {
    let owned = match (kind.is_copy(), by_ref) {
        (true, true) => format!("*{place}"),
        (true, false) => place.to_string(),
        (false, _) => format!("{place}.clone()"),
    };
    format!("{JSON}::Value::from({owned})")
}

fn render_struct(w: &mut SourceWriter, def: &AccessorDef) {
    w.line(format!("/// Typed accessor for the `{}` parameters.", def.origin));
    w.line("#[derive(Debug, Clone)]");
    w.open(format!("pub struct {} {{", def.type_name));
    for field in &def.fields {
        w.line(format!("{}: {},", field.name, field_type(field)));
    }
    if def.catch_all {
        w.line("unlisted: ::std::collections::BTreeMap<String, String>,");
    }
    w.close("}");
}

fn render_inherent(w: &mut SourceWriter, def: &AccessorDef) {
    w.open(format!("impl {} {{", def.type_name));
    w.line("/// Name of the schema this type was generated from.");
    w.line(format!("pub const ORIGIN: &'static str = {:?};", def.origin));
    w.line("/// The source schema, serialized as JSON.");
    w.line(format!("pub const SCHEMA_JSON: &'static str = {:?};", def.schema_json));
    if def.catch_all {
        let names: Vec<String> = def.fields.iter().map(|f| format!("{:?}", f.name)).collect();
        w.line(format!(
            "const DECLARED: &'static [&'static str] = &[{}];",
            names.join(", ")
        ));
    }
    w.blank();

    w.line("/// Rebuilds the source schema, for use with the runtime checker.");
    w.open(format!(
        "pub fn schema() -> Result<{CORE}::Schema, {CORE}::SchemaError> {{"
    ));
    w.line(format!("{CORE}::Schema::from_json(Self::SCHEMA_JSON)"));
    w.close("}");
    w.blank();

    render_from_lookup(w, def);
    if def.json_output || def.from_body {
        w.blank();
        w.line("/// Builds the accessor from a JSON object.");
        w.open(format!(
            "pub fn from_json(text: &str) -> Result<Self, {CORE}::ConversionError> {{"
        ));
        w.line(format!("let map = {CORE}::convert::json_object(text)?;"));
        w.line("Self::from_lookup(&map)");
        w.close("}");
    }
    if def.from_body {
        w.blank();
        w.line("/// Builds the accessor from a JSON request body.");
        w.open(format!(
            "pub fn from_body(body: &[u8]) -> Result<Self, {CORE}::ConversionError> {{"
        ));
        w.line(format!("let map = {CORE}::convert::json_body(body)?;"));
        w.line("Self::from_lookup(&map)");
        w.close("}");
    }

    for field in &def.fields {
        w.blank();
        render_getter(w, field);
    }

    if def.catch_all {
        w.blank();
        w.line("/// Returns an undeclared parameter captured at construction.");
        w.open("pub fn get(&self, key: &str) -> Option<&str> {");
        w.line("self.unlisted.get(key).map(String::as_str)");
        w.close("}");
    }

    w.blank();
    render_to_map(w, def);
    if def.json_output {
        w.blank();
        w.line("/// Serializes [`to_map`](Self::to_map) as a JSON object.");
        w.open("pub fn to_json(&self) -> String {");
        w.line(format!("{JSON}::Value::Object(self.to_map()).to_string()"));
        w.close("}");
    }
    w.close("}");
}

fn render_from_lookup(w: &mut SourceWriter, def: &AccessorDef) {
    let empty = def.fields.is_empty() && !def.catch_all;
    w.line("/// Builds the accessor from string-keyed input.");
    w.line("///");
    w.line("/// # Errors");
    w.line("///");
    w.line("/// Fails if a required parameter is missing or a present value does not");
    w.line("/// convert to its type.");
    if empty {
        w.line("#[allow(unused_variables)]");
    }
    w.line(format!(
        "pub fn from_lookup<L>(source: &L) -> Result<Self, {CORE}::ConversionError>"
    ));
    w.line("where");
    w.line(format!("    L: {CORE}::Lookup + ?Sized,"));
    w.open("{");
    w.open("Ok(Self {");
    for field in &def.fields {
        let expr = match &field.mode {
            FieldMode::Required => {
                format!("{CORE}::convert::required(source, {:?})?", field.name)
            }
            FieldMode::Defaulted(literal) => format!(
                "{CORE}::convert::or_default(source, {:?}, {})?",
                field.name,
                default_expr(literal)
            ),
            FieldMode::Optional => {
                format!("{CORE}::convert::optional(source, {:?})?", field.name)
            }
        };
        w.line(format!("{}: {expr},", field.name));
    }
    if def.catch_all {
        w.open("unlisted: source");
        w.line(".entries()");
        w.line(".into_iter()");
        w.line(".filter(|(key, _)| !Self::DECLARED.contains(key))");
        w.line(".map(|(key, value)| (key.to_string(), value.into_owned()))");
        w.line(".collect(),");
        w.dedent();
    }
    w.close("})");
    w.close("}");
}

fn render_getter(w: &mut SourceWriter, field: &FieldDef) {
    let name = &field.name;
    let (ret, body) = match (field.kind.is_copy(), field.always_present()) {
        (true, _) => (field_type(field), format!("self.{name}")),
        (false, true) => ("&str".to_string(), format!("&self.{name}")),
        (false, false) => ("Option<&str>".to_string(), format!("self.{name}.as_deref()")),
    };
    w.line(format!("/// The `{name}` parameter ({}).", field.kind));
    w.open(format!("pub fn {name}(&self) -> {ret} {{"));
    w.line(body);
    w.close("}");
}

fn render_to_map(w: &mut SourceWriter, def: &AccessorDef) {
    w.line("/// Projects the declared values, plus any captured extras, into a map.");
    w.line("/// Absent optional values are omitted.");
    w.open(format!(
        "pub fn to_map(&self) -> {JSON}::Map<String, {JSON}::Value> {{"
    ));
    let binding = if def.fields.is_empty() && !def.catch_all {
        "let map"
    } else {
        "let mut map"
    };
    w.line(format!("{binding} = {JSON}::Map::new();"));
    for field in &def.fields {
        let name = &field.name;
        if field.always_present() {
            w.line(format!(
                "map.insert({name:?}.to_string(), {});",
                json_value(field.kind, &format!("self.{name}"), false)
            ));
        } else {
            w.open(format!("if let Some(value) = &self.{name} {{"));
            w.line(format!(
                "map.insert({name:?}.to_string(), {});",
                json_value(field.kind, "value", true)
            ));
            w.close("}");
        }
    }
    if def.catch_all {
        w.open("for (key, value) in &self.unlisted {");
        w.line(format!("map.insert(key.clone(), {JSON}::Value::from(value.clone()));"));
        w.close("}");
    }
    w.line("map");
    w.close("}");
}

fn render_eq(w: &mut SourceWriter, def: &AccessorDef) {
    w.open(format!("impl PartialEq for {} {{", def.type_name));
    if def.fields.is_empty() {
        w.open("fn eq(&self, _other: &Self) -> bool {");
        w.line("true");
    } else {
        w.open("fn eq(&self, other: &Self) -> bool {");
        for (i, field) in def.fields.iter().enumerate() {
            let name = &field.name;
            let cmp = match (field.kind, field.always_present()) {
                (ScalarType::Double, true) => {
                    format!("self.{name}.to_bits() == other.{name}.to_bits()")
                }
                (ScalarType::Double, false) => {
                    format!("self.{name}.map(f64::to_bits) == other.{name}.map(f64::to_bits)")
                }
                _ => format!("self.{name} == other.{name}"),
            };
            if i == 0 {
                w.line(cmp);
            } else {
                w.line(format!("    && {cmp}"));
            }
        }
    }
    w.close("}");
    w.close("}");
    w.blank();
    w.line(format!("impl Eq for {} {{}}", def.type_name));
}

fn render_hash(w: &mut SourceWriter, def: &AccessorDef) {
    w.open(format!("impl ::std::hash::Hash for {} {{", def.type_name));
    let state = if def.fields.is_empty() { "_state" } else { "state" };
    w.open(format!(
        "fn hash<H: ::std::hash::Hasher>(&self, {state}: &mut H) {{"
    ));
    for field in &def.fields {
        let name = &field.name;
        let value = match (field.kind, field.always_present()) {
            (ScalarType::Double, true) => format!("&self.{name}.to_bits()"),
            (ScalarType::Double, false) => format!("&self.{name}.map(f64::to_bits)"),
            _ => format!("&self.{name}"),
        };
        w.line(format!("::std::hash::Hash::hash({value}, state);"));
    }
    w.close("}");
    w.close("}");
}

fn render_display(w: &mut SourceWriter, def: &AccessorDef) {
    w.open(format!("impl ::std::fmt::Display for {} {{", def.type_name));
    w.open("fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {");
    w.line(format!("f.write_str({:?})?;", format!("{} {{", def.type_name)));
    for (i, field) in def.fields.iter().enumerate() {
        let name = &field.name;
        let sep = if i == 0 { " " } else { ", " };
        if field.always_present() {
            w.line(format!("write!(f, \"{sep}{name} = {{}}\", self.{name})?;"));
        } else {
            w.open(format!("match &self.{name} {{"));
            w.line(format!(
                "Some(value) => write!(f, \"{sep}{name} = {{value}}\")?,"
            ));
            w.line(format!("None => f.write_str(\"{sep}{name} = <absent>\")?,"));
            w.close("}");
        }
    }
    w.line("f.write_str(\" }\")");
    w.close("}");
    w.close("}");
}

fn render_validatable(w: &mut SourceWriter, def: &AccessorDef) {
    let resolves = def.fields.iter().any(|f| !f.validators.is_empty());
    let resolver = if resolves { "resolver" } else { "_resolver" };
    let problems = if def.has_checks() { "problems" } else { "_problems" };
    w.open(format!("impl {CORE}::Validatable for {} {{", def.type_name));
    w.open("fn validate(");
    w.line("&self,");
    w.line(format!("{resolver}: &dyn {CORE}::Resolver,"));
    w.line(format!("{problems}: &mut {CORE}::Problems,"));
    w.close(format!(") -> Result<(), {CORE}::ResolveError> {{"));
    w.indent();
    for field in def.fields.iter().filter(|f| f.has_checks()) {
        let name = &field.name;
        if field.always_present() {
            w.open("{");
            w.line(format!("let value = self.{name}.to_string();"));
        } else {
            w.open(format!("if let Some(value) = &self.{name} {{"));
            w.line("let value = value.to_string();");
        }
        for constraint in &field.constraints {
            w.line(format!(
                "{CORE}::Validator::validate(&{}, problems, {name:?}, Some(value.as_str()));",
                constraint.variant_path()
            ));
        }
        for id in &field.validators {
            w.line(format!(
                "let validator = {CORE}::Resolver::resolve(resolver, {id:?})?;"
            ));
            w.line(format!(
                "{CORE}::Validator::validate(&*validator, problems, {name:?}, Some(value.as_str()));"
            ));
        }
        w.close("}");
    }
    w.line("Ok(())");
    w.close("}");
    w.close("}");
}
