//! Named string constraints that can be attached to any parameter.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Problems;
use crate::validators::Validator;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("static regex must compile")
});
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^\s/?#]+([/?#]\S*)?$")
        .expect("static regex must compile")
});
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("static regex must compile"));
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$")
        .expect("static regex must compile")
});
static NON_NEGATIVE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$")
        .expect("static regex must compile")
});
static HEXADECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]+$").expect("static regex must compile"));
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("static regex must compile")
});

/// A named built-in constraint.
///
/// Absent values never produce problems; combine with a required parameter
/// to reject absence.
///
/// # Examples
///
/// ```
/// use paramspec_core::{Constraint, Problems, Validator};
///
/// let mut problems = Problems::new();
/// Constraint::Hexadecimal.validate(&mut problems, "color", Some("ff00aa"));
/// Constraint::NoWhitespace.validate(&mut problems, "user", Some("a b"));
/// assert_eq!(problems.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Not empty after trimming.
    NonEmpty,
    /// Contains no whitespace characters.
    NoWhitespace,
    /// A plausible email address.
    EmailAddress,
    /// An absolute URL with a scheme and host.
    Url,
    /// An optionally signed run of digits.
    ValidInteger,
    /// A decimal number, optionally with an exponent.
    ValidNumber,
    /// A decimal number without a sign.
    NonNegativeNumber,
    /// Hexadecimal digits only.
    Hexadecimal,
    /// Does not start with an ASCII digit.
    MayNotStartWithDigit,
    /// A programming-language style identifier.
    Identifier,
}

impl Constraint {
    /// Every constraint, in declaration order.
    pub const ALL: [Constraint; 10] = [
        Constraint::NonEmpty,
        Constraint::NoWhitespace,
        Constraint::EmailAddress,
        Constraint::Url,
        Constraint::ValidInteger,
        Constraint::ValidNumber,
        Constraint::NonNegativeNumber,
        Constraint::Hexadecimal,
        Constraint::MayNotStartWithDigit,
        Constraint::Identifier,
    ];

    /// The `snake_case` name used in schema documents and generated code.
    pub fn name(self) -> &'static str {
        match self {
            Constraint::NonEmpty => "non_empty",
            Constraint::NoWhitespace => "no_whitespace",
            Constraint::EmailAddress => "email_address",
            Constraint::Url => "url",
            Constraint::ValidInteger => "valid_integer",
            Constraint::ValidNumber => "valid_number",
            Constraint::NonNegativeNumber => "non_negative_number",
            Constraint::Hexadecimal => "hexadecimal",
            Constraint::MayNotStartWithDigit => "may_not_start_with_digit",
            Constraint::Identifier => "identifier",
        }
    }

    /// The Rust path of this variant, for generated code.
    pub fn variant_path(self) -> String {
        format!("::paramspec_core::Constraint::{self:?}")
    }

    fn check(self, key: &str, raw: &str) -> Option<String> {
        let ok = match self {
            Constraint::NonEmpty => !raw.trim().is_empty(),
            Constraint::NoWhitespace => !raw.chars().any(char::is_whitespace),
            Constraint::EmailAddress => EMAIL.is_match(raw),
            Constraint::Url => URL.is_match(raw),
            Constraint::ValidInteger => INTEGER.is_match(raw),
            Constraint::ValidNumber => NUMBER.is_match(raw),
            Constraint::NonNegativeNumber => NON_NEGATIVE_NUMBER.is_match(raw),
            Constraint::Hexadecimal => HEXADECIMAL.is_match(raw),
            Constraint::MayNotStartWithDigit => !raw.starts_with(|c: char| c.is_ascii_digit()),
            Constraint::Identifier => IDENTIFIER.is_match(raw),
        };
        if ok {
            return None;
        }
        let problem = match self {
            Constraint::NonEmpty => format!("{key} may not be empty or all whitespace"),
            Constraint::NoWhitespace => format!("{key} may not contain whitespace: '{raw}'"),
            Constraint::EmailAddress => format!("{key} is not a valid email address: '{raw}'"),
            Constraint::Url => format!("{key} is not a valid URL: '{raw}'"),
            Constraint::ValidInteger => format!("{key} is not an integer: '{raw}'"),
            Constraint::ValidNumber => format!("{key} is not a number: '{raw}'"),
            Constraint::NonNegativeNumber => {
                format!("{key} is not a non-negative number: '{raw}'")
            }
            Constraint::Hexadecimal => format!("{key} is not hexadecimal: '{raw}'"),
            Constraint::MayNotStartWithDigit => {
                format!("{key} may not start with a digit: '{raw}'")
            }
            Constraint::Identifier => format!("{key} is not a valid identifier: '{raw}'"),
        };
        Some(problem)
    }
}

impl Validator for Constraint {
    fn validate(&self, problems: &mut Problems, key: &str, value: Option<&str>) {
        if let Some(problem) = value.and_then(|raw| self.check(key, raw)) {
            problems.append(problem);
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problems_for(constraint: Constraint, raw: &str) -> Problems {
        let mut problems = Problems::new();
        constraint.validate(&mut problems, "value", Some(raw));
        problems
    }

    #[test]
    fn test_absent_value_passes_every_constraint() {
        for constraint in Constraint::ALL {
            let mut problems = Problems::new();
            constraint.validate(&mut problems, "value", None);
            assert!(problems.is_empty(), "{constraint} flagged an absent value");
        }
    }

    #[test]
    fn test_accepting_inputs() {
        let cases = [
            (Constraint::NonEmpty, " x "),
            (Constraint::NoWhitespace, "abc"),
            (Constraint::EmailAddress, "someone@example.com"),
            (Constraint::Url, "https://example.com/a?b=c"),
            (Constraint::ValidInteger, "-42"),
            (Constraint::ValidNumber, "-3.5e10"),
            (Constraint::NonNegativeNumber, "0.25"),
            (Constraint::Hexadecimal, "DEADbeef"),
            (Constraint::MayNotStartWithDigit, "a1"),
            (Constraint::Identifier, "_name1"),
        ];
        for (constraint, raw) in cases {
            assert!(problems_for(constraint, raw).is_empty(), "{constraint} rejected {raw}");
        }
    }

    #[test]
    fn test_rejecting_inputs() {
        let cases = [
            (Constraint::NonEmpty, "  "),
            (Constraint::NoWhitespace, "a b"),
            (Constraint::EmailAddress, "someone@"),
            (Constraint::Url, "example.com"),
            (Constraint::ValidInteger, "4.2"),
            (Constraint::ValidNumber, "1..2"),
            (Constraint::NonNegativeNumber, "-1"),
            (Constraint::Hexadecimal, "xyz"),
            (Constraint::MayNotStartWithDigit, "1a"),
            (Constraint::Identifier, "a-b"),
        ];
        for (constraint, raw) in cases {
            assert_eq!(problems_for(constraint, raw).len(), 1, "{constraint} accepted {raw}");
        }
    }

    #[test]
    fn test_names_match_serde() {
        for constraint in Constraint::ALL {
            let json = serde_json::to_string(&constraint).unwrap();
            assert_eq!(json, format!("\"{}\"", constraint.name()));
        }
        assert_eq!(
            Constraint::EmailAddress.variant_path(),
            "::paramspec_core::Constraint::EmailAddress"
        );
    }
}
