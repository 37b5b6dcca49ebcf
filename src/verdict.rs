//! The outcome of evaluating a validator expression.

use std::fmt;
use std::ops::Not;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ValidatorError, ValidatorResult};

/// A pass/fail verdict with the statement that produced it.
///
/// Immutable once built. Converts to `bool`, and renders as
/// `"<statement> => <passed>"`.
///
/// # Example
///
/// ```rust
/// use checkwise::prelude::*;
///
/// let verdict = ge(0).call(5);
/// assert!(bool::from(&verdict));
/// assert_eq!(verdict.statement(), "ge(0, 5)");
/// assert_eq!(verdict.origin(), "ge");
/// assert_eq!(verdict.to_string(), "ge(0, 5) => true");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    passed: bool,
    statement: String,
    origin: String,
}

impl Verdict {
    /// Build a verdict.
    pub fn new(passed: bool, statement: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            passed,
            statement: statement.into(),
            origin: origin.into(),
        }
    }

    /// Build a verdict from a dynamic value, which must be exactly a boolean.
    pub fn try_from_value(
        value: &Value,
        statement: impl Into<String>,
        origin: impl Into<String>,
    ) -> ValidatorResult<Self> {
        match value {
            Value::Bool(passed) => Ok(Self::new(*passed, statement, origin)),
            other => Err(ValidatorError::NotBoolean(other.to_string())),
        }
    }

    /// The boolean outcome.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// The expression and arguments that were evaluated.
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Name of the validator or combinator that produced this verdict.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// `Ok` when passed, `Err` otherwise, for use with `?`.
    pub fn into_result(self) -> Result<Verdict, Verdict> {
        if self.passed {
            Ok(self)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.statement, self.passed)
    }
}

impl From<Verdict> for bool {
    fn from(verdict: Verdict) -> Self {
        verdict.passed
    }
}

impl From<&Verdict> for bool {
    fn from(verdict: &Verdict) -> Self {
        verdict.passed
    }
}

impl Not for &Verdict {
    type Output = bool;

    fn not(self) -> bool {
        !self.passed
    }
}

impl Not for Verdict {
    type Output = bool;

    fn not(self) -> bool {
        !self.passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_appends_outcome() {
        let v = Verdict::new(false, "lt(1, 2)", "lt");
        assert_eq!(v.to_string(), "lt(1, 2) => false");
    }

    #[test]
    fn try_from_value_accepts_only_booleans() {
        assert!(Verdict::try_from_value(&json!(true), "s", "o")
            .unwrap()
            .passed());
        for bad in [json!(1), json!("true"), json!(null), json!([])] {
            let err = Verdict::try_from_value(&bad, "s", "o").unwrap_err();
            assert!(matches!(err, ValidatorError::NotBoolean(_)));
        }
    }

    #[test]
    fn boolean_conversions() {
        let v = Verdict::new(true, "s", "o");
        assert!(!!&v);
        assert!(bool::from(&v));
        assert!(bool::from(v));
    }

    #[test]
    fn into_result_splits_on_outcome() {
        assert!(Verdict::new(true, "s", "o").into_result().is_ok());
        let failed = Verdict::new(false, "s", "o").into_result().unwrap_err();
        assert_eq!(failed.statement(), "s");
    }

    #[test]
    fn serializes_all_fields() {
        let v = Verdict::new(true, "eq(1, 1)", "eq");
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"passed": true, "statement": "eq(1, 1)", "origin": "eq"})
        );
    }
}
