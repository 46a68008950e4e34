//! Problem reporting shared by generated `validate` methods and the runtime
//! checker.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationFailed;

/// Ordered, append-only list of problems found during one validation pass.
///
/// Every appended problem is treated as fatal; there is no severity level.
/// A report is created per call and inspected by the caller, which decides
/// whether to raise via [`ensure_empty`](Problems::ensure_empty).
///
/// # Examples
///
/// ```
/// use paramspec_core::Problems;
///
/// let mut problems = Problems::new();
/// assert!(problems.ensure_empty().is_ok());
///
/// problems.append("Missing name");
/// assert!(problems.has_problems());
/// assert_eq!(problems.lead(), Some("Missing name"));
/// assert!(problems.ensure_empty().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Problems {
    problems: Vec<String>,
}

impl Problems {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one problem.
    pub fn append(&mut self, problem: impl Into<String>) {
        self.problems.push(problem.into());
    }

    /// Returns `true` if at least one problem was recorded.
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    /// Returns `true` if no problem was recorded.
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Returns the number of recorded problems.
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// Returns the first recorded problem.
    pub fn lead(&self) -> Option<&str> {
        self.problems.first().map(String::as_str)
    }

    /// Iterates over the recorded problems in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.problems.iter().map(String::as_str)
    }

    /// Returns the problems as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.problems
    }

    /// Returns `true` if any recorded problem contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.problems.iter().any(|p| p.contains(needle))
    }

    /// Raises if the report is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailed`] carrying every recorded problem.
    pub fn ensure_empty(&self) -> Result<(), ValidationFailed> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailed {
                problems: self.problems.clone(),
            })
        }
    }

    /// Consuming variant of [`ensure_empty`](Problems::ensure_empty).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailed`] if any problem was recorded.
    pub fn into_result(self) -> Result<(), ValidationFailed> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailed {
                problems: self.problems,
            })
        }
    }

    /// Consumes the report, returning the raw problem list.
    pub fn into_inner(self) -> Vec<String> {
        self.problems
    }
}

impl Extend<String> for Problems {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.problems.extend(iter);
    }
}

impl IntoIterator for Problems {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.into_iter()
    }
}

impl fmt::Display for Problems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, problem) in self.problems.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{problem}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problems_keep_insertion_order() {
        let mut problems = Problems::new();
        problems.append("first");
        problems.append(String::from("second"));

        assert_eq!(problems.as_slice(), ["first", "second"]);
        assert_eq!(problems.to_string(), "first\nsecond");
    }

    #[test]
    fn test_into_result_carries_all_problems() {
        let mut problems = Problems::new();
        problems.append("a");
        problems.append("b");

        let err = problems.into_result().unwrap_err();
        assert_eq!(err.problems, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "2 parameter problem(s): a; b");
    }
}
