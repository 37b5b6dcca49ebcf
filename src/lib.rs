//! # Checkwise
//!
//! Composable validators that explain themselves.
//!
//! A validator is built in two steps: a hoisting call fixes its reference
//! arguments (`ge(0)`), and a final call evaluates it against a subject
//! (`ge(0).call(5)`). Evaluation returns a [`Verdict`] carrying the outcome
//! and a readable statement of what was checked, so a failure deep inside a
//! composed rule reports the exact check that failed.
//!
//! ## Quick Example
//!
//! ```rust
//! use checkwise::prelude::*;
//! use serde_json::json;
//!
//! let order = every([
//!     value("id", [is_instance(Kind::String), non_empty_string()]),
//!     value("items", [each([value("qty", [gt(0)])])]),
//!     value("homepage", [is_url()]),
//! ]);
//!
//! let ok = json!({
//!     "id": "A-1",
//!     "items": [{"qty": 1}, {"qty": 3}],
//!     "homepage": "https://example.com",
//! });
//! assert!(order.call(ok).passed());
//!
//! let bad = json!({
//!     "id": "A-2",
//!     "items": [{"qty": 1}, {"qty": 0}],
//!     "homepage": "https://example.com",
//! });
//! let verdict = order.call(bad);
//! assert!(!verdict.passed());
//! assert_eq!(verdict.statement(), "gt(0, 0)");
//! ```
//!
//! ## Errors
//!
//! By default a validator never fails: errors raised while evaluating
//! (an unparsable JSON string, comparing a string to a number) become failing
//! verdicts that embed the error text. Use [`Expr::call_strict`], or pass the
//! `raise_error` keyword to [`Expr::evaluate`], to get the [`ValidatorError`]
//! instead.
//!
//! ```rust
//! use checkwise::prelude::*;
//!
//! let verdict = is_in(5).call(5);
//! assert!(!verdict.passed());
//! assert_eq!(verdict.statement(), "is_in(5, 5), expected container, got integer: 5");
//!
//! assert!(is_in(5).call_strict(5).is_err());
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod expr;
pub mod library;
pub mod testing;
pub mod value;
pub mod verdict;

// Re-exports
pub use error::{ValidatorError, ValidatorResult};
pub use expr::{
    Arity, Basic, BasicFn, Combinator, ErrorPolicy, Expr, ExprKind, HighOrder, HighOrderFn, Lazy,
    Unpacked, Unpacker, UnpackerFn,
};
pub use value::{Arg, Args, Hoisted, Kind, RAISE_ERROR};
pub use verdict::Verdict;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{ValidatorError, ValidatorResult};
    pub use crate::expr::{
        Arity, BasicFn, Combinator, ErrorPolicy, Expr, HighOrderFn, Lazy, Unpacked, Unpacker,
        UnpackerFn,
    };
    pub use crate::library::*;
    pub use crate::value::{Args, Hoisted, Kind};
    pub use crate::verdict::Verdict;
}
