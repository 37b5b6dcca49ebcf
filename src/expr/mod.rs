//! Validator expressions
//!
//! Every expression is one of four kinds, each produced by a wrapper that
//! splits evaluation into a hoisting call and a final call:
//!
//! | Kind | Wrapper | Final call yields |
//! |---|---|---|
//! | [`Basic`] | [`BasicFn`] | [`Verdict`] |
//! | [`HighOrder`] | [`HighOrderFn`] | [`Verdict`] |
//! | [`Unpacker`] | [`UnpackerFn`] | [`Unpacked`] values |
//! | [`Lazy`] | [`Lazy::new`] | a fresh [`Value`](serde_json::Value) |
//!
//! Hoisting never mutates: each call builds a new expression, so one base
//! validator can back any number of independent expressions.
//!
//! # Example
//!
//! ```rust
//! use checkwise::prelude::*;
//!
//! let percentage = every([ge(0), le(100)]);
//! assert!(percentage.call(42).passed());
//!
//! let verdict = percentage.call(142);
//! assert!(!verdict.passed());
//! assert_eq!(verdict.statement(), "le(100, 142)");
//! ```

mod basic;
mod high_order;
mod lazy;
mod unpacker;

use std::fmt;

pub use basic::{Arity, Basic, BasicFn};
pub use high_order::{Combinator, HighOrder, HighOrderFn};
pub use lazy::Lazy;
pub use unpacker::{Unpacked, Unpacker, UnpackerFn};

use crate::error::{ValidatorError, ValidatorResult};
use crate::value::Args;
use crate::verdict::Verdict;

/// What to do with an error raised during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Convert the error into a failing verdict that quotes it.
    #[default]
    Capture,
    /// Return the original error unmodified.
    Propagate,
}

impl ErrorPolicy {
    pub(crate) fn capture(
        self,
        err: ValidatorError,
        statement: String,
        origin: &str,
    ) -> ValidatorResult<Verdict> {
        match self {
            ErrorPolicy::Propagate => Err(err),
            ErrorPolicy::Capture => {
                #[cfg(feature = "tracing")]
                tracing::debug!(origin, error = %err, "captured validator error");
                Ok(Verdict::new(false, format!("{statement}, {err}"), origin))
            }
        }
    }
}

/// Tag naming the wrapper kind of an [`Expr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// A wrapped predicate.
    Basic,
    /// A combinator over other expressions.
    HighOrder,
    /// A producer of derived values.
    Unpacker,
    /// A deferred value.
    Lazy,
}

impl ExprKind {
    fn name(self) -> &'static str {
        match self {
            ExprKind::Basic => "basic",
            ExprKind::HighOrder => "high_order",
            ExprKind::Unpacker => "unpacker",
            ExprKind::Lazy => "lazy",
        }
    }
}

/// A composable validator expression.
#[derive(Debug, Clone)]
pub enum Expr {
    /// See [`BasicFn`].
    Basic(Basic),
    /// See [`HighOrderFn`].
    HighOrder(HighOrder),
    /// See [`UnpackerFn`].
    Unpacker(Unpacker),
    /// See [`Lazy`].
    Lazy(Lazy),
}

impl Expr {
    /// The wrapper kind.
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Basic(_) => ExprKind::Basic,
            Expr::HighOrder(_) => ExprKind::HighOrder,
            Expr::Unpacker(_) => ExprKind::Unpacker,
            Expr::Lazy(_) => ExprKind::Lazy,
        }
    }

    /// Name of the underlying validator, combinator, unpacker or lazy value.
    pub fn name(&self) -> &'static str {
        match self {
            Expr::Basic(b) => b.name(),
            Expr::HighOrder(h) => h.name(),
            Expr::Unpacker(u) => u.name(),
            Expr::Lazy(l) => l.name(),
        }
    }

    /// Evaluate, capturing every error into a failing verdict.
    ///
    /// A `raise_error` keyword in `args` is stripped and ignored.
    pub fn call(&self, args: impl Into<Args>) -> Verdict {
        let mut args = args.into();
        args.take_raise_error();
        self.run(args, ErrorPolicy::Capture)
            .unwrap_or_else(|err| Verdict::new(false, format!("{self}, {err}"), self.name()))
    }

    /// Evaluate, returning the first error unmodified instead of a verdict.
    pub fn call_strict(&self, args: impl Into<Args>) -> ValidatorResult<Verdict> {
        let mut args = args.into();
        args.take_raise_error();
        self.run(args, ErrorPolicy::Propagate)
    }

    /// Evaluate with the policy chosen by the `raise_error` keyword.
    ///
    /// ```rust
    /// use checkwise::prelude::*;
    ///
    /// let precise = float_precision_magnitude_le(2, 2);
    /// assert!(!precise.evaluate(Args::from(3)).unwrap().passed());
    /// assert!(precise.evaluate(Args::from(3).kwarg("raise_error", true)).is_err());
    /// ```
    pub fn evaluate(&self, args: impl Into<Args>) -> ValidatorResult<Verdict> {
        let mut args = args.into();
        let policy = if args.take_raise_error() {
            ErrorPolicy::Propagate
        } else {
            ErrorPolicy::Capture
        };
        self.run(args, policy)
    }

    /// The unpacker inside this expression, if it is one.
    pub fn as_unpacker(&self) -> Option<&Unpacker> {
        match self {
            Expr::Unpacker(u) => Some(u),
            _ => None,
        }
    }

    pub(crate) fn run(&self, args: Args, policy: ErrorPolicy) -> ValidatorResult<Verdict> {
        match self {
            Expr::Basic(b) => b.evaluate(args, policy),
            Expr::HighOrder(h) => h.evaluate(args, policy),
            Expr::Unpacker(_) | Expr::Lazy(_) => {
                Err(ValidatorError::NotAValidator(self.kind().name()))
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Basic(b) => write!(f, "{b}"),
            Expr::HighOrder(h) => write!(f, "{h}"),
            Expr::Unpacker(u) => write!(f, "{u}"),
            Expr::Lazy(l) => write!(f, "{l}"),
        }
    }
}

impl From<Lazy> for Expr {
    fn from(lazy: Lazy) -> Self {
        Expr::Lazy(lazy)
    }
}

impl From<Unpacker> for Expr {
    fn from(unpacker: Unpacker) -> Self {
        Expr::Unpacker(unpacker)
    }
}
