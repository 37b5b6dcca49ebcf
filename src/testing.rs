//! Testing utilities for validator expressions
//!
//! Assertion macros over [`Verdict`](crate::Verdict)s and a [`Probe`]
//! validator that records how often it ran, for checking short-circuiting.
//!
//! # Examples
//!
//! ```rust
//! use checkwise::prelude::*;
//! use checkwise::{assert_failed, assert_passed};
//!
//! assert_passed!(ge(0).call(1));
//! assert_failed!(ge(0).call(-1), "ge(0, -1)");
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::expr::{Arity, BasicFn, Expr};
use crate::value::Hoisted;

/// A validator with a fixed outcome that counts its evaluations.
///
/// # Example
///
/// ```rust
/// use checkwise::prelude::*;
/// use checkwise::testing::Probe;
///
/// let probe = Probe::new(true);
/// let guarded = every([ge(0), probe.expr()]);
///
/// guarded.call(-1);
/// assert_eq!(probe.calls(), 0);
/// guarded.call(1);
/// assert_eq!(probe.calls(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Probe {
    outcome: bool,
    calls: Arc<AtomicUsize>,
}

impl Probe {
    /// A probe that always returns `outcome`.
    pub fn new(outcome: bool) -> Self {
        Self {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// An expression backed by this probe. Accepts any arguments.
    pub fn expr(&self) -> Expr {
        let outcome = self.outcome;
        let calls = self.calls.clone();
        BasicFn::new("probe", Arity::at_least(0), move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(outcome)
        })
        .hoist(Hoisted::new())
    }

    /// Evaluations so far, across every expression from [`Probe::expr`].
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Assert that a verdict passed.
///
/// # Example
///
/// ```rust
/// use checkwise::{assert_passed, Verdict};
///
/// assert_passed!(Verdict::new(true, "ok()", "ok"));
/// ```
#[macro_export]
macro_rules! assert_passed {
    ($verdict:expr) => {{
        let verdict: $crate::Verdict = $verdict;
        if !verdict.passed() {
            panic!("Expected a passing verdict, got: {}", verdict);
        }
    }};
}

/// Assert that a verdict failed, optionally with an exact statement.
///
/// # Example
///
/// ```rust
/// use checkwise::{assert_failed, Verdict};
///
/// let verdict = Verdict::new(false, "positive(-1)", "positive");
/// assert_failed!(verdict.clone());
/// assert_failed!(verdict, "positive(-1)");
/// ```
#[macro_export]
macro_rules! assert_failed {
    ($verdict:expr) => {{
        let verdict: $crate::Verdict = $verdict;
        if verdict.passed() {
            panic!("Expected a failing verdict, got: {}", verdict);
        }
    }};
    ($verdict:expr, $statement:expr) => {{
        let verdict: $crate::Verdict = $verdict;
        if verdict.passed() {
            panic!("Expected a failing verdict, got: {}", verdict);
        }
        assert_eq!(verdict.statement(), $statement);
    }};
}

/// Assert that a verdict failed with a statement containing `needle`.
///
/// # Example
///
/// ```rust
/// use checkwise::prelude::*;
/// use checkwise::assert_failed_with;
///
/// assert_failed_with!(ge(0).call("x"), "cannot order");
/// ```
#[macro_export]
macro_rules! assert_failed_with {
    ($verdict:expr, $needle:expr) => {{
        let verdict: $crate::Verdict = $verdict;
        if verdict.passed() {
            panic!("Expected a failing verdict, got: {}", verdict);
        }
        assert!(
            verdict.statement().contains($needle),
            "statement {:?} does not mention {:?}",
            verdict.statement(),
            $needle
        );
    }};
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for crate::value::Kind {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use crate::value::Kind;
        prop_oneof![
            Just(Kind::Null),
            Just(Kind::Bool),
            Just(Kind::Integer),
            Just(Kind::Float),
            Just(Kind::Number),
            Just(Kind::String),
            Just(Kind::Array),
            Just(Kind::Object),
        ]
        .boxed()
    }
}

/// Null, boolean, integer, finite float or short string values.
#[cfg(feature = "proptest")]
pub fn any_scalar() -> BoxedStrategy<serde_json::Value> {
    use serde_json::Value;
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1e9f64..1e9).prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
    ]
    .boxed()
}
