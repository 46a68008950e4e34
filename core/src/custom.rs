//! Ready-made custom validators that can be registered with a
//! [`ValidatorRegistry`](crate::ValidatorRegistry).

use crate::Problems;
use crate::error::ResolveError;
use crate::validators::Validator;

/// Bounds the character count of a value.
///
/// # Examples
///
/// ```
/// use paramspec_core::{Problems, StringLength, Validator};
///
/// let length = StringLength::new(Some(3), Some(20)).unwrap();
/// let mut problems = Problems::new();
/// length.validate(&mut problems, "password", Some("ab"));
/// assert_eq!(problems.lead(), Some("password must be at least 3 characters long"));
///
/// assert!(StringLength::new(Some(5), Some(5)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLength {
    min: Option<usize>,
    max: Option<usize>,
}

impl StringLength {
    /// Creates a length validator; either bound may be omitted.
    ///
    /// # Errors
    ///
    /// [`ResolveError::InvalidLengthBounds`] if both bounds are given and
    /// `max <= min`.
    pub fn new(min: Option<usize>, max: Option<usize>) -> Result<Self, ResolveError> {
        if let (Some(min), Some(max)) = (min, max) {
            if max <= min {
                return Err(ResolveError::InvalidLengthBounds { min, max });
            }
        }
        Ok(Self { min, max })
    }

    /// Lower bound, if any.
    pub fn min(&self) -> Option<usize> {
        self.min
    }

    /// Upper bound, if any.
    pub fn max(&self) -> Option<usize> {
        self.max
    }
}

impl Validator for StringLength {
    fn validate(&self, problems: &mut Problems, key: &str, value: Option<&str>) {
        let Some(raw) = value else {
            return;
        };
        let len = raw.chars().count();
        if let Some(min) = self.min.filter(|&min| len < min) {
            problems.append(format!("{key} must be at least {min} characters long"));
        }
        if let Some(max) = self.max.filter(|&max| len > max) {
            problems.append(format!("{key} must be no more than {max} characters long"));
        }
    }
}

const COMMON_PASSWORDS: &[&str] = &[
    "password", "1234", "12345", "123456", "1234567", "12345678", "querty", "baseball", "dragon",
    "football", "monkey", "letmein", "mustang", "111111", "access", "shadow", "michael",
    "superman", "696969", "123123", "batman", "trustno1",
];

/// Rejects passwords from a short list of the most commonly used ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommonPasswords;

impl Validator for CommonPasswords {
    fn validate(&self, problems: &mut Problems, _key: &str, value: Option<&str>) {
        let Some(raw) = value else {
            return;
        };
        let lowered = raw.to_lowercase();
        if COMMON_PASSWORDS.contains(&lowered.as_str()) {
            problems.append("That password is too commonly used");
        }
    }
}
