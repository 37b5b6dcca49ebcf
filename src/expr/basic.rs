//! Basic validator wrapper
//!
//! Turns a predicate over [`Args`] into a two-phase expression: the first
//! call hoists arguments, the second supplies the rest and produces a
//! [`Verdict`].

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{ErrorPolicy, Expr};
use crate::error::{ValidatorError, ValidatorResult};
use crate::value::{Args, Hoisted};
use crate::verdict::Verdict;

type PredicateFn = Arc<dyn Fn(&Args) -> ValidatorResult<bool> + Send + Sync>;

/// Accepted number of positional arguments, hoisted and late combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    min: usize,
    max: Option<usize>,
}

impl Arity {
    /// Exactly `n` positional arguments.
    pub const fn exact(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// Between `min` and `max` positional arguments, inclusive.
    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// At least `min` positional arguments.
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub(crate) fn check(&self, name: &str, given: usize) -> ValidatorResult<()> {
        let within = given >= self.min && self.max.is_none_or(|max| given <= max);
        if within {
            return Ok(());
        }
        let expected = match self.max {
            Some(max) if max == self.min => max.to_string(),
            Some(max) => format!("from {} to {}", self.min, max),
            None => format!("at least {}", self.min),
        };
        Err(ValidatorError::Arity {
            name: name.to_string(),
            expected,
            given,
        })
    }
}

/// A predicate waiting for its first (hoisting) call.
///
/// # Example
///
/// ```rust
/// use checkwise::prelude::*;
///
/// let divisible_by = BasicFn::new("divisible_by", Arity::exact(2), |args| {
///     let divisor = args.f64_at(0)?;
///     let value = args.f64_at(1)?;
///     Ok(value % divisor == 0.0)
/// });
///
/// let even = divisible_by.hoist(Hoisted::new().arg(2));
/// assert!(even.call(4).passed());
/// assert_eq!(even.call(3).to_string(), "divisible_by(2, 3) => false");
/// ```
#[derive(Clone)]
pub struct BasicFn {
    name: &'static str,
    arity: Arity,
    predicate: PredicateFn,
}

impl BasicFn {
    /// Wrap a boolean predicate.
    pub fn new<F>(name: &'static str, arity: Arity, predicate: F) -> Self
    where
        F: Fn(&Args) -> ValidatorResult<bool> + Send + Sync + 'static,
    {
        Self {
            name,
            arity,
            predicate: Arc::new(predicate),
        }
    }

    /// Wrap a predicate returning a dynamic value.
    ///
    /// Anything other than a JSON boolean is an error, captured like any other.
    pub fn dynamic<F>(name: &'static str, arity: Arity, predicate: F) -> Self
    where
        F: Fn(&Args) -> ValidatorResult<Value> + Send + Sync + 'static,
    {
        Self::new(name, arity, move |args| match predicate(args)? {
            Value::Bool(passed) => Ok(passed),
            other => Err(ValidatorError::NotBoolean(other.to_string())),
        })
    }

    /// First call: capture `hoisted` and return the expression awaiting the rest.
    pub fn hoist(&self, hoisted: Hoisted) -> Expr {
        Expr::Basic(Basic {
            func: self.clone(),
            hoisted,
        })
    }

    /// Validator name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for BasicFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicFn")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A basic validator with its hoisted arguments.
#[derive(Debug, Clone)]
pub struct Basic {
    func: BasicFn,
    hoisted: Hoisted,
}

impl Basic {
    /// Hoist more arguments, leaving this expression untouched.
    pub fn bind(&self, args: impl Into<Args>) -> Self {
        Self {
            func: self.func.clone(),
            hoisted: self.hoisted.extend(args.into()),
        }
    }

    /// Validator name.
    pub fn name(&self) -> &'static str {
        self.func.name
    }

    pub(crate) fn evaluate(&self, args: Args, policy: ErrorPolicy) -> ValidatorResult<Verdict> {
        let mut merged = self.hoisted.merge(args);
        merged.take_raise_error();
        let statement = format!("{}({})", self.func.name, merged);

        let outcome = self
            .func
            .arity
            .check(self.func.name, merged.len())
            .and_then(|()| (self.func.predicate)(&merged));

        match outcome {
            Ok(passed) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(validator = self.func.name, passed, "evaluated");
                Ok(Verdict::new(passed, statement, self.func.name))
            }
            Err(err) => policy.capture(err, statement, self.func.name),
        }
    }
}

impl fmt::Display for Basic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.func.name, self.hoisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Arg;
    use serde_json::json;

    fn at_least() -> BasicFn {
        BasicFn::new("at_least", Arity::exact(2), |args| {
            Ok(args.f64_at(1)? >= args.f64_at(0)?)
        })
    }

    fn basic(expr: Expr) -> Basic {
        match expr {
            Expr::Basic(b) => b,
            other => panic!("expected basic, got {:?}", other.kind()),
        }
    }

    #[test]
    fn statement_lists_merged_arguments() {
        let v = at_least().hoist(Hoisted::new().arg(0)).call(5);
        assert!(v.passed());
        assert_eq!(v.statement(), "at_least(0, 5)");
        assert_eq!(v.origin(), "at_least");
    }

    #[test]
    fn errors_are_captured_with_their_text() {
        let v = at_least().hoist(Hoisted::new().arg(0)).call("x");
        assert!(!v.passed());
        assert_eq!(
            v.statement(),
            "at_least(0, \"x\"), expected number, got string: \"x\""
        );
    }

    #[test]
    fn strict_policy_returns_the_error() {
        let err = at_least()
            .hoist(Hoisted::new().arg(0))
            .call_strict("x")
            .unwrap_err();
        assert!(matches!(err, ValidatorError::Type { .. }));
    }

    #[test]
    fn arity_is_checked_before_the_predicate() {
        let v = at_least().hoist(Hoisted::new()).call(1);
        assert!(!v.passed());
        assert!(v.statement().contains("takes 2 positional arguments but 1 were given"));

        let err = at_least()
            .hoist(Hoisted::new().arg(1))
            .call_strict((2, 3))
            .unwrap_err();
        assert!(matches!(err, ValidatorError::Arity { given: 3, .. }));
    }

    #[test]
    fn arity_ranges_describe_themselves() {
        let err = Arity::range(1, 2).check("f", 3).unwrap_err();
        assert!(err.to_string().contains("from 1 to 2"));
        let err = Arity::at_least(2).check("f", 0).unwrap_err();
        assert!(err.to_string().contains("at least 2"));
        assert!(Arity::at_least(2).check("f", 9).is_ok());
    }

    #[test]
    fn bind_creates_a_new_expression() {
        let open = basic(at_least().hoist(Hoisted::new()));
        let bound = open.bind(10);
        assert_eq!(open.to_string(), "at_least()");
        assert_eq!(bound.to_string(), "at_least(10)");
        assert!(bound.evaluate(Args::from(11), ErrorPolicy::Capture).unwrap().passed());
    }

    #[test]
    fn dynamic_rejects_non_boolean_results() {
        let echo = BasicFn::dynamic("echo", Arity::exact(1), |args| Ok(args.get(0)?.clone()));
        let expr = echo.hoist(Hoisted::new());
        assert!(expr.call(true).passed());
        let v = expr.call(1);
        assert!(!v.passed());
        assert!(v.statement().ends_with("should be true or false, got 1"));
    }

    #[test]
    fn raise_error_keyword_never_reaches_the_predicate() {
        let no_keywords = BasicFn::new("no_keywords", Arity::exact(1), |args| {
            Ok(args.keywords().is_empty())
        });
        let expr = no_keywords.hoist(Hoisted::new());
        let v = expr.evaluate(Args::from(1).kwarg("raise_error", false)).unwrap();
        assert!(v.passed());
        assert_eq!(v.statement(), "no_keywords(1)");
    }

    #[test]
    fn lazy_arguments_resolve_at_evaluation() {
        let lazy = crate::expr::Lazy::new("five", || json!(5));
        let expr = at_least().hoist(Hoisted::new().arg(Arg::Lazy(lazy)));
        assert_eq!(expr.to_string(), "at_least(five())");
        assert_eq!(expr.call(5).statement(), "at_least(5, 5)");
    }
}
