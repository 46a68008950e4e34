//! Built-in validators for the scalar types.
//!
//! Each rule is a pure function `(key, raw) -> Option<problem>`. An absent
//! value (`None`) never yields a problem; absence is handled separately by
//! [`PRESENT`]. Rules are wrapped in [`Rule`] so they can be used through the
//! common [`Validator`] interface, and [`merge`] combines two validators so
//! that both always run.
//!
//! # Examples
//!
//! ```
//! use paramspec_core::{Problems, Validator, validators};
//!
//! let mut problems = Problems::new();
//! validators::INTEGER.validate(&mut problems, "count", Some("2147483647"));
//! assert!(problems.is_empty());
//!
//! validators::INTEGER.validate(&mut problems, "count", Some("2147483648"));
//! assert!(problems.mentions("greater than"));
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::Problems;

/// A validator for a single string-valued parameter.
///
/// Implemented by the built-in rules, by [`Constraint`](crate::Constraint),
/// by the bundled custom validators and by user-supplied validators obtained
/// through a [`Resolver`](crate::Resolver). Implementations are expected to
/// be stateless; instances are shared across calls and threads.
pub trait Validator: Send + Sync {
    /// Appends any problems with `value` (the raw value of parameter `key`)
    /// to `problems`. `value` is `None` when the parameter is absent.
    fn validate(&self, problems: &mut Problems, key: &str, value: Option<&str>);
}

static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9-][0-9.]{0,36}$").expect("static regex must compile"));
static INTEGER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9-][0-9]{0,36}$").expect("static regex must compile"));
static NON_NEGATIVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,36}$").expect("static regex must compile"));

/// A named single-problem rule.
#[derive(Clone, Copy)]
pub struct Rule {
    name: &'static str,
    check: fn(&str, Option<&str>) -> Option<String>,
}

impl Rule {
    /// Wraps a rule function under a diagnostic name.
    pub const fn new(name: &'static str, check: fn(&str, Option<&str>) -> Option<String>) -> Self {
        Self { name, check }
    }

    /// Returns the rule's diagnostic name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the rule, returning its problem if any.
    pub fn check(&self, key: &str, value: Option<&str>) -> Option<String> {
        (self.check)(key, value)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

impl Validator for Rule {
    fn validate(&self, problems: &mut Problems, key: &str, value: Option<&str>) {
        if let Some(problem) = self.check(key, value) {
            problems.append(problem);
        }
    }
}

/// Two validators run unconditionally against the same input.
///
/// Problems from `first` are reported before problems from `second`.
#[derive(Debug, Clone, Copy)]
pub struct Merged<A, B> {
    first: A,
    second: B,
}

/// Combines two validators; both always run and all problems are kept.
pub const fn merge<A, B>(first: A, second: B) -> Merged<A, B> {
    Merged { first, second }
}

impl<A: Validator, B: Validator> Validator for Merged<A, B> {
    fn validate(&self, problems: &mut Problems, key: &str, value: Option<&str>) {
        self.first.validate(problems, key, value);
        self.second.validate(problems, key, value);
    }
}

fn present(key: &str, value: Option<&str>) -> Option<String> {
    match value {
        Some(_) => None,
        None => Some(format!("Missing {key}")),
    }
}

// Loose syntactic filter: multiple dots or a dot-only body still pass.
fn number(key: &str, value: Option<&str>) -> Option<String> {
    let raw = value?;
    if NUMBER_PATTERN.is_match(raw) {
        None
    } else {
        Some(format!("{key} is not a number: '{raw}'"))
    }
}

fn integer(key: &str, value: Option<&str>) -> Option<String> {
    let raw = value?;
    if !INTEGER_PATTERN.is_match(raw) {
        return Some(format!("{key} is not an integer: '{raw}'"));
    }
    match raw.parse::<i64>() {
        Ok(parsed) if parsed > i64::from(i32::MAX) => Some(format!(
            "{key} is greater than the 32-bit maximum {}: {parsed}",
            i32::MAX
        )),
        Ok(parsed) if parsed < i64::from(i32::MIN) => Some(format!(
            "{key} is less than the 32-bit minimum {}: {parsed}",
            i32::MIN
        )),
        Ok(_) => None,
        Err(_) => Some(format!("Not a valid number: {raw}")),
    }
}

fn long(key: &str, value: Option<&str>) -> Option<String> {
    let raw = value?;
    if !INTEGER_PATTERN.is_match(raw) {
        return Some(format!("{key} is not an integer: '{raw}'"));
    }
    match raw.parse::<i64>() {
        Ok(_) => None,
        Err(_) => Some(format!("Not a valid 64-bit integer: {raw}")),
    }
}

fn non_negative(key: &str, value: Option<&str>) -> Option<String> {
    let raw = value?;
    if NON_NEGATIVE_PATTERN.is_match(raw) {
        None
    } else {
        Some(format!("{key} is not a non-negative integer: '{raw}'"))
    }
}

fn boolean(key: &str, value: Option<&str>) -> Option<String> {
    let raw = value?;
    if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("false") {
        None
    } else {
        Some(format!("{key} is not a boolean value: '{raw}'"))
    }
}

fn non_empty(key: &str, value: Option<&str>) -> Option<String> {
    let raw = value?;
    if raw.trim().is_empty() {
        Some(format!("{key} may not be empty or all whitespace"))
    } else {
        None
    }
}

fn no_op(_key: &str, _value: Option<&str>) -> Option<String> {
    None
}

const INTEGER_RULE: Rule = Rule::new("integer", integer);
const NON_NEGATIVE_RULE: Rule = Rule::new("non_negative", non_negative);

/// Reports `Missing {key}` when the value is absent.
pub static PRESENT: Rule = Rule::new("present", present);
/// Loose decimal-number filter used for `Double`.
pub static NUMBER: Rule = Rule::new("number", number);
/// Integer pattern plus 32-bit range check.
pub static INTEGER: Rule = INTEGER_RULE;
/// Integer pattern plus 64-bit parse.
pub static LONG: Rule = Rule::new("long", long);
/// Unsigned digit-only pattern.
pub static NON_NEGATIVE: Rule = NON_NEGATIVE_RULE;
/// [`INTEGER`] merged with [`NON_NEGATIVE`]; used by both non-negative kinds.
pub static NON_NEGATIVE_INTEGER: Merged<Rule, Rule> = merge(INTEGER_RULE, NON_NEGATIVE_RULE);
/// Case-insensitive `true` / `false`.
pub static BOOLEAN: Rule = Rule::new("boolean", boolean);
/// Non-empty after trimming surrounding whitespace.
pub static NON_EMPTY: Rule = Rule::new("non_empty", non_empty);
/// Always valid.
pub static NO_OP: Rule = Rule::new("no_op", no_op);

#[cfg(test)]
mod tests {
    use super::*;

    fn run(validator: &dyn Validator, raw: &str) -> Problems {
        let mut problems = Problems::new();
        validator.validate(&mut problems, "value", Some(raw));
        problems
    }

    #[test]
    fn test_absent_values_never_produce_problems() {
        let all: [&dyn Validator; 8] = [
            &NUMBER,
            &INTEGER,
            &LONG,
            &NON_NEGATIVE,
            &NON_NEGATIVE_INTEGER,
            &BOOLEAN,
            &NON_EMPTY,
            &NO_OP,
        ];
        for validator in all {
            let mut problems = Problems::new();
            validator.validate(&mut problems, "value", None);
            assert!(problems.is_empty());
        }
    }

    #[test]
    fn test_present_reports_missing_key() {
        let mut problems = Problems::new();
        PRESENT.validate(&mut problems, "name", None);
        PRESENT.validate(&mut problems, "name", Some(""));
        assert_eq!(problems.as_slice(), ["Missing name"]);
    }

    #[test]
    fn test_number_is_a_loose_filter() {
        assert!(run(&NUMBER, "7.52306").is_empty());
        assert!(run(&NUMBER, "-3").is_empty());
        assert!(run(&NUMBER, "1.2.3").is_empty());
        assert!(run(&NUMBER, "-...").is_empty());
        assert!(run(&NUMBER, &"1".repeat(37)).is_empty());

        assert!(run(&NUMBER, &"1".repeat(38)).mentions("is not a number"));
        assert!(run(&NUMBER, ".5").mentions("is not a number"));
        assert!(run(&NUMBER, "1e5").mentions("is not a number"));
    }

    #[test]
    fn test_integer_bounds() {
        assert!(run(&INTEGER, "2147483647").is_empty());
        assert!(run(&INTEGER, "-2147483648").is_empty());
        assert!(run(&INTEGER, "-1").is_empty());

        let over = run(&INTEGER, "2147483648");
        assert_eq!(over.len(), 1);
        assert!(over.mentions("greater than the 32-bit maximum"));

        let under = run(&INTEGER, "-2147483649");
        assert_eq!(under.len(), 1);
        assert!(under.mentions("less than the 32-bit minimum"));
    }

    #[test]
    fn test_integer_rejects_non_digits() {
        assert_eq!(
            run(&INTEGER, "12a").as_slice(),
            ["value is not an integer: '12a'"]
        );
        assert!(run(&INTEGER, "3.725").mentions("is not an integer"));
    }

    #[test]
    fn test_integer_pattern_match_but_unparseable() {
        assert_eq!(run(&INTEGER, "-").as_slice(), ["Not a valid number: -"]);
        assert_eq!(run(&INTEGER, "1-").as_slice(), ["value is not an integer: '1-'"]);
        assert!(run(&INTEGER, &"9".repeat(30)).mentions("Not a valid number"));
    }

    #[test]
    fn test_long_accepts_full_64_bit_range() {
        assert!(run(&LONG, "9223372036854775807").is_empty());
        assert!(run(&LONG, "-9223372036854775808").is_empty());
        assert!(run(&LONG, "2147483648").is_empty());

        assert!(run(&LONG, "9223372036854775808").mentions("Not a valid 64-bit integer"));
        assert!(run(&LONG, "abc").mentions("is not an integer"));
    }

    #[test]
    fn test_non_negative_integer_runs_both_rules() {
        assert!(run(&NON_NEGATIVE_INTEGER, "0").is_empty());
        assert!(run(&NON_NEGATIVE_INTEGER, "2147483647").is_empty());

        let negative = run(&NON_NEGATIVE_INTEGER, "-1");
        assert_eq!(
            negative.as_slice(),
            ["value is not a non-negative integer: '-1'"]
        );

        let huge = run(&NON_NEGATIVE_INTEGER, &"6".repeat(40));
        assert_eq!(huge.len(), 2);
        assert!(huge.as_slice()[0].contains("is not an integer"));
        assert!(huge.as_slice()[1].contains("is not a non-negative integer"));

        let wide = run(&NON_NEGATIVE_INTEGER, "2147483648");
        assert_eq!(wide.len(), 1);
        assert!(wide.mentions("greater than"));
    }

    #[test]
    fn test_boolean_is_case_insensitive() {
        for raw in ["TRUE", "true", "false", "False"] {
            assert!(run(&BOOLEAN, raw).is_empty(), "{raw} should pass");
        }
        assert_eq!(
            run(&BOOLEAN, "yes").as_slice(),
            ["value is not a boolean value: 'yes'"]
        );
    }

    #[test]
    fn test_non_empty_trims_whitespace() {
        assert!(run(&NON_EMPTY, "").mentions("may not be empty"));
        assert!(run(&NON_EMPTY, "   ").mentions("may not be empty"));
        assert!(run(&NON_EMPTY, " x ").is_empty());
    }

    #[test]
    fn test_merge_orders_first_before_second() {
        let merged = merge(NON_EMPTY, BOOLEAN);
        let problems = run(&merged, " ");
        assert_eq!(
            problems.as_slice(),
            [
                "value may not be empty or all whitespace",
                "value is not a boolean value: ' '"
            ]
        );
    }
}
