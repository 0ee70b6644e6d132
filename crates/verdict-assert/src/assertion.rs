//! The assertion evaluator.
//!
//! An [`Assertion`] pairs an actual value with a negation flag. Every
//! judgment funnels through one routine that flips the condition when the
//! assertion is negated and raises [`VerdictError::Assertion`] carrying the
//! negation state it was evaluated under.

use std::any::Any;
use std::fmt;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use verdict_core::{Result, VerdictError};
use verdict_mock::Mock;

use crate::capture::Captured;
use crate::equality::{canonical_encoding, structurally_equal, to_json};

/// Starts a judgment on `actual`.
pub const fn judge<T>(actual: T) -> Assertion<T> {
    Assertion::new(actual)
}

/// One pending judgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion<T> {
    actual: T,
    negated: bool,
}

impl<T> Assertion<T> {
    /// Creates a non-negated assertion.
    pub const fn new(actual: T) -> Self {
        Self {
            actual,
            negated: false,
        }
    }

    /// Returns the same judgment with the negation flag flipped.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self {
            actual: self.actual,
            negated: !self.negated,
        }
    }

    /// Returns true if judgments are inverted.
    pub const fn is_negated(&self) -> bool {
        self.negated
    }

    /// The value under judgment.
    pub const fn actual(&self) -> &T {
        &self.actual
    }

    fn pass(&self, condition: bool, message: impl FnOnce() -> String) -> Result<()> {
        let effective = if self.negated { !condition } else { condition };
        tracing::trace!(condition, negated = self.negated, effective, "judgment evaluated");
        if effective {
            Ok(())
        } else {
            Err(VerdictError::assertion(message(), self.negated))
        }
    }
}

impl<T: PartialEq + fmt::Debug> Assertion<T> {
    /// Identity: passes iff `actual == expected`.
    ///
    /// # Errors
    /// Returns an assertion failure if the judgment does not hold.
    pub fn to_be(&self, expected: T) -> Result<()> {
        self.pass(self.actual == expected, || {
            format!("Expected {:?} to be {expected:?}", self.actual)
        })
    }
}

impl<T: Serialize> Assertion<T> {
    fn capture(&self) -> Result<Captured> {
        Captured::of(&self.actual)
    }

    /// Structural equality against any serializable value.
    ///
    /// # Errors
    /// Returns an assertion failure if the judgment does not hold, or a
    /// serialization error if either side cannot be converted or contains
    /// `NaN` or an infinity.
    pub fn to_equal<U: Serialize>(&self, expected: U) -> Result<()> {
        let actual = to_json(&self.actual)?;
        let expected = to_json(&expected)?;
        self.pass(structurally_equal(&actual, &expected), || {
            format!(
                "Expected {} to equal {}",
                canonical_encoding(&actual),
                canonical_encoding(&expected)
            )
        })
    }

    /// Truthiness: passes iff the value is truthy. The infinities are
    /// truthy and `NaN` is falsy.
    ///
    /// # Errors
    /// Returns an assertion failure if the judgment does not hold.
    pub fn to_be_truthy(&self) -> Result<()> {
        let actual = self.capture()?;
        self.pass(actual.is_truthy(), || {
            format!("Ensure {} is truthy", actual.describe())
        })
    }

    /// Pattern match: passes iff the value is a string matching `pattern`.
    ///
    /// # Errors
    /// Returns [`VerdictError::NotText`] immediately, regardless of negation,
    /// if the value is not a string.
    pub fn to_match(&self, pattern: &Regex) -> Result<()> {
        let actual = self.capture()?;
        match actual.value() {
            Value::String(text) => self.pass(pattern.is_match(text), || {
                format!("Ensure '{text}' matches {pattern}")
            }),
            _ => Err(VerdictError::NotText(actual.describe())),
        }
    }

    /// Compiles `pattern` and judges it with [`Assertion::to_match`].
    ///
    /// # Errors
    /// Returns [`VerdictError::Pattern`] if the pattern does not compile.
    pub fn to_match_pattern(&self, pattern: &str) -> Result<()> {
        let regex = Regex::new(pattern)?;
        self.to_match(&regex)
    }

    /// Property presence: passes iff the value is an object with member
    /// `name`, or an array with an element at index `name` (`"0"`, `"1"`, ...).
    ///
    /// # Errors
    /// Returns an assertion failure if the judgment does not hold.
    pub fn to_have_property(&self, name: &str) -> Result<()> {
        let actual = self.capture()?;
        let present = match actual.value() {
            Value::Object(map) => map.contains_key(name),
            Value::Array(items) => array_index(name).is_some_and(|i| i < items.len()),
            _ => false,
        };
        self.pass(present, || format!("Intend object to have '{name}'"))
    }
}

// Only canonical decimal indices count: "01" and "+1" are ordinary keys.
fn array_index(name: &str) -> Option<usize> {
    name.parse::<usize>()
        .ok()
        .filter(|i| i.to_string() == name)
}

/// Mock judgments.
///
/// The judged value must be an owned [`Mock`] handle; clones share one call
/// log, so judge `mock.clone()` to keep using the mock afterwards. Borrowed
/// handles such as `&Mock` are not `'static` and do not meet the bound.
impl<T: Any> Assertion<T> {
    fn mock(&self) -> Result<&Mock> {
        let actual: &dyn Any = &self.actual;
        actual.downcast_ref::<Mock>().ok_or(VerdictError::NotAMock)
    }

    /// Passes iff the mock was invoked at least once.
    ///
    /// # Errors
    /// Returns [`VerdictError::NotAMock`] if the value is not a mock.
    pub fn to_have_been_called(&self) -> Result<()> {
        let mock = self.mock()?;
        self.pass(mock.call_count() > 0, || {
            "Expected mock to have been called".to_string()
        })
    }

    /// Passes iff some recorded call's arguments structurally equal `expected`.
    ///
    /// # Errors
    /// Returns [`VerdictError::NotAMock`] if the value is not a mock.
    pub fn to_have_been_called_with(&self, expected: Vec<Value>) -> Result<()> {
        let mock = self.mock()?;
        let expected = Value::Array(expected);
        let matched = mock
            .calls()
            .into_iter()
            .any(|call| structurally_equal(&Value::Array(call), &expected));
        self.pass(matched, || {
            format!("Expected mock called with {}", canonical_encoding(&expected))
        })
    }

    /// Passes iff the mock was invoked exactly `times` times.
    ///
    /// # Errors
    /// Returns [`VerdictError::NotAMock`] if the value is not a mock.
    pub fn to_have_been_called_times(&self, times: usize) -> Result<()> {
        let mock = self.mock()?;
        let count = mock.call_count();
        self.pass(count == times, || {
            format!("Expected mock called {times} times, got {count}")
        })
    }
}
