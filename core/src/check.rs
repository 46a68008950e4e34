//! The runtime parameter checker.
//!
//! Evaluates a [`Schema`] against live input without generated code. The
//! generated accessors implement [`Validatable`] for the same purpose once an
//! accessor value exists.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::ResolveError;
use crate::lookup::Lookup;
use crate::problems::Problems;
use crate::resolve::{Resolver, Whitelist};
use crate::schema::{ParameterSpec, Schema};
use crate::types::ScalarType;
use crate::validators::{self, Validator};

/// Implemented by generated accessors with validation code.
pub trait Validatable {
    /// Runs every declared constraint and custom validator against the
    /// accessor's values, appending to `problems`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if a custom validator cannot be resolved.
    fn validate(
        &self,
        resolver: &dyn Resolver,
        problems: &mut Problems,
    ) -> Result<(), ResolveError>;
}

/// Checks string-keyed input against schemas.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use paramspec_core::*;
///
/// let schema = Schema::builder("Search")
///     .param(ParameterSpec::new("limit").with_type(ScalarType::Integer))
///     .build()
///     .unwrap();
/// let registry = ValidatorRegistry::new();
/// let checker = ParamChecker::new(&registry);
///
/// let input = HashMap::from([("limit".to_string(), "ten".to_string())]);
/// let problems = checker.check(&schema, &input, &ParamsWhitelist::empty()).unwrap();
/// assert_eq!(problems.as_slice(), ["limit is not an integer: 'ten'"]);
/// ```
#[derive(Clone, Copy)]
pub struct ParamChecker<'a> {
    resolver: &'a dyn Resolver,
}

impl<'a> ParamChecker<'a> {
    /// Creates a checker resolving custom validators through `resolver`.
    pub fn new(resolver: &'a dyn Resolver) -> Self {
        Self { resolver }
    }

    /// Checks `input` against `schema`.
    ///
    /// Required parameters without a default are always evaluated; every
    /// other parameter only when its key is present. Unless the schema
    /// allows unlisted parameters, keys that are neither declared nor
    /// whitelisted are reported together as one problem.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if a custom validator cannot be resolved.
    pub fn check<L>(
        &self,
        schema: &Schema,
        input: &L,
        whitelist: &dyn Whitelist,
    ) -> Result<Problems, ResolveError>
    where
        L: Lookup + ?Sized,
    {
        let mut problems = Problems::new();
        let keys = input.keys();

        let (required, rest): (Vec<&ParameterSpec>, Vec<&ParameterSpec>) = schema
            .params()
            .iter()
            .partition(|spec| spec.effectively_required());

        for spec in required {
            let value = input.get(&spec.name);
            self.run_chain(spec, value.as_deref(), &mut problems)?;
        }
        for spec in rest {
            if keys.contains(spec.name.as_str()) {
                let value = input.get(&spec.name);
                self.run_chain(spec, value.as_deref(), &mut problems)?;
            }
        }

        if !schema.allow_unlisted_parameters() {
            let declared = schema.declared_names();
            let permitted = whitelist.names();
            let extra: BTreeSet<&str> = keys
                .iter()
                .copied()
                .filter(|key| !declared.contains(key) && !permitted.contains(key))
                .collect();
            if !extra.is_empty() {
                let listed: Vec<&str> = extra.into_iter().collect();
                problems.append(format!(
                    "Parameters contains unknown keys: {}",
                    listed.join(", ")
                ));
            }
        }

        debug!(
            schema = schema.name(),
            inputs = keys.len(),
            problems = problems.len(),
            "checked parameters"
        );
        Ok(problems)
    }

    fn run_chain(
        &self,
        spec: &ParameterSpec,
        value: Option<&str>,
        problems: &mut Problems,
    ) -> Result<(), ResolveError> {
        let key = spec.name.as_str();
        validators::PRESENT.validate(problems, key, value);
        if spec.kind != ScalarType::String {
            spec.kind.builtin_validator().validate(problems, key, value);
        }
        for constraint in &spec.constraints {
            constraint.validate(problems, key, value);
        }
        for id in &spec.validators {
            self.resolver.resolve(id)?.validate(problems, key, value);
        }
        Ok(())
    }
}

/// Checks `input` against `schema` with a one-off [`ParamChecker`].
///
/// # Errors
///
/// Returns [`ResolveError`] if a custom validator cannot be resolved.
pub fn check<L>(
    schema: &Schema,
    input: &L,
    whitelist: &dyn Whitelist,
    resolver: &dyn Resolver,
) -> Result<Problems, ResolveError>
where
    L: Lookup + ?Sized,
{
    ParamChecker::new(resolver).check(schema, input, whitelist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommonPasswords, Constraint, ParamsWhitelist, StringLength, ValidatorRegistry};
    use std::collections::HashMap;

    fn input(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn registry() -> ValidatorRegistry {
        ValidatorRegistry::new()
            .with("good_password", CommonPasswords)
            .with("length_3_20", StringLength::new(Some(3), Some(20)).unwrap())
    }

    fn login() -> Schema {
        Schema::builder("Login")
            .param(ParameterSpec::new("user").with_constraint(Constraint::NoWhitespace))
            .param(
                ParameterSpec::new("password")
                    .with_validator("good_password")
                    .with_validator("length_3_20"),
            )
            .param(ParameterSpec::new("count").with_type(ScalarType::Integer).with_default("5"))
            .param(ParameterSpec::new("age").with_type(ScalarType::NonNegativeInteger).optional())
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_input() {
        let registry = registry();
        let problems = check(
            &login(),
            &input(&[("user", "tim"), ("password", "hunter22")]),
            &ParamsWhitelist::empty(),
            &registry,
        )
        .unwrap();
        assert!(problems.is_empty(), "{problems}");
    }

    #[test]
    fn test_missing_required_and_chain_order() {
        let registry = registry();
        let problems = check(
            &login(),
            &input(&[("user", "t i m")]),
            &ParamsWhitelist::empty(),
            &registry,
        )
        .unwrap();
        assert_eq!(
            problems.as_slice(),
            ["user may not contain whitespace: 't i m'", "Missing password"]
        );
    }

    #[test]
    fn test_custom_validators_run() {
        let registry = registry();
        let problems = check(
            &login(),
            &input(&[("user", "tim"), ("password", "MONKEY")]),
            &ParamsWhitelist::empty(),
            &registry,
        )
        .unwrap();
        assert_eq!(problems.as_slice(), ["That password is too commonly used"]);
    }

    #[test]
    fn test_optional_only_checked_when_present() {
        let registry = registry();
        let base = [("user", "tim"), ("password", "hunter22")];
        let whitelist = ParamsWhitelist::empty();

        let absent = check(&login(), &input(&base), &whitelist, &registry).unwrap();
        assert!(absent.is_empty());

        let mut with_age = base.to_vec();
        with_age.push(("age", "-3"));
        with_age.push(("count", "x"));
        let present = check(&login(), &input(&with_age), &whitelist, &registry).unwrap();
        assert_eq!(present.len(), 2);
        assert!(present.mentions("count is not an integer: 'x'"));
        assert!(present.mentions("age is not a non-negative integer: '-3'"));
    }

    #[test]
    fn test_unknown_validator_is_an_error() {
        let schema = Schema::builder("S")
            .param(ParameterSpec::new("a").with_validator("nope"))
            .build()
            .unwrap();
        let registry = ValidatorRegistry::new();
        let err = check(&schema, &input(&[("a", "x")]), &ParamsWhitelist::empty(), &registry)
            .unwrap_err();
        assert_eq!(err, ResolveError::Unknown("nope".into()));
    }

    #[test]
    fn test_unlisted_keys_reported_once() {
        let schema = Schema::builder("S")
            .param(ParameterSpec::new("a"))
            .build()
            .unwrap();
        let registry = ValidatorRegistry::new();
        let problems = check(
            &schema,
            &input(&[("a", "1"), ("zz", "2"), ("b", "3")]),
            &ParamsWhitelist::empty(),
            &registry,
        )
        .unwrap();
        assert_eq!(problems.as_slice(), ["Parameters contains unknown keys: b, zz"]);

        let open = Schema::builder("S")
            .param(ParameterSpec::new("a"))
            .allow_unlisted_parameters(true)
            .build()
            .unwrap();
        let problems = check(
            &open,
            &input(&[("a", "1"), ("zz", "2")]),
            &ParamsWhitelist::empty(),
            &registry,
        )
        .unwrap();
        assert!(problems.is_empty());
    }
}
