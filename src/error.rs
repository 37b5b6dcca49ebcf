//! Error taxonomy for validator evaluation.
//!
//! These errors never escape a plain [`Expr::call`](crate::Expr::call): the
//! basic and high-order wrappers capture them into failing
//! [`Verdict`](crate::Verdict)s. They only surface through the strict entry
//! points, unmodified.

use thiserror::Error;

use crate::value::Kind;

/// Result type for predicate and unpacker bodies.
pub type ValidatorResult<T> = Result<T, ValidatorError>;

/// Errors raised while evaluating a validator expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidatorError {
    /// An unpacker could not derive values from its source.
    #[error("{0}")]
    Unpack(String),

    /// A value had the wrong shape for the operation.
    #[error("expected {expected}, got {found}: {value}")]
    Type {
        /// The kind the operation needed.
        expected: String,
        /// The kind actually received.
        found: Kind,
        /// Rendering of the offending value.
        value: String,
    },

    /// Wrong number of positional arguments for a validator.
    #[error("{name}() takes {expected} positional arguments but {given} were given")]
    Arity {
        /// Validator name.
        name: String,
        /// Human-readable description of the accepted count.
        expected: String,
        /// Number of positional arguments received.
        given: usize,
    },

    /// A required argument was not supplied.
    #[error("missing argument '{0}'")]
    MissingArgument(String),

    /// A predicate produced something other than a boolean.
    #[error("should be true or false, got {0}")]
    NotBoolean(String),

    /// A combinator child cannot produce a verdict.
    #[error("{0} expression cannot be used as a validator")]
    NotAValidator(&'static str),

    /// A regular expression failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// Any other failure inside a predicate.
    #[error("{0}")]
    Predicate(String),
}

impl ValidatorError {
    /// Creates an unpack error with the given message.
    pub fn unpack(msg: impl Into<String>) -> Self {
        Self::Unpack(msg.into())
    }

    /// Creates a type error for `value`, which should have been `expected`.
    pub fn type_mismatch(expected: impl Into<String>, value: &serde_json::Value) -> Self {
        Self::Type {
            expected: expected.into(),
            found: Kind::of(value),
            value: value.to_string(),
        }
    }

    /// Creates a generic predicate error with the given message.
    pub fn predicate(msg: impl Into<String>) -> Self {
        Self::Predicate(msg.into())
    }

    /// Returns true for errors raised by unpackers.
    pub fn is_unpack(&self) -> bool {
        matches!(self, Self::Unpack(_))
    }
}

impl From<regex::Error> for ValidatorError {
    fn from(err: regex::Error) -> Self {
        Self::InvalidPattern(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_mismatch_reports_found_kind() {
        let err = ValidatorError::type_mismatch("float", &json!(3));
        assert_eq!(err.to_string(), "expected float, got integer: 3");
    }

    #[test]
    fn unpack_is_distinct_kind() {
        assert!(ValidatorError::unpack("nope").is_unpack());
        assert!(!ValidatorError::predicate("nope").is_unpack());
    }

    #[test]
    fn arity_message() {
        let err = ValidatorError::Arity {
            name: "ge".into(),
            expected: "2".into(),
            given: 3,
        };
        assert_eq!(
            err.to_string(),
            "ge() takes 2 positional arguments but 3 were given"
        );
    }
}
