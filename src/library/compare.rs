//! Comparison, membership and type validators
//!
//! Each validator hoists its reference argument and takes the subject at the
//! final call: `ge(0)` is "subject >= 0".

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidatorError;
use crate::expr::{Arity, BasicFn, Expr};
use crate::value::{compare, loose_eq, membership, Arg, Hoisted, Kind};

static EQ: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("eq", Arity::exact(2), |args| {
        Ok(loose_eq(args.get(0)?, args.get(1)?))
    })
});

static GE: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("ge", Arity::exact(2), |args| {
        Ok(compare(args.get(1)?, args.get(0)?)?.is_ge())
    })
});

static GT: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("gt", Arity::exact(2), |args| {
        Ok(compare(args.get(1)?, args.get(0)?)?.is_gt())
    })
});

static LE: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("le", Arity::exact(2), |args| {
        Ok(compare(args.get(1)?, args.get(0)?)?.is_le())
    })
});

static LT: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("lt", Arity::exact(2), |args| {
        Ok(compare(args.get(1)?, args.get(0)?)?.is_lt())
    })
});

static IS_IN: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("is_in", Arity::exact(2), |args| {
        membership(args.get(0)?, args.get(1)?)
    })
});

static CONTAINS: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("contains", Arity::exact(2), |args| {
        membership(args.get(1)?, args.get(0)?)
    })
});

static IS_TYPE: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("is_type", Arity::exact(2), |args| {
        let expected: Kind = args.str_at(0)?.parse()?;
        Ok(expected == Kind::of(args.get(1)?))
    })
});

static IS_INSTANCE: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("is_instance", Arity::exact(2), |args| {
        let expected: Kind = args.str_at(0)?.parse()?;
        Ok(expected.admits(args.get(1)?))
    })
});

/// Subject equals `expected`; numbers compare by value.
pub fn eq(expected: impl Into<Arg>) -> Expr {
    EQ.hoist(Hoisted::new().arg(expected))
}

/// Subject is greater than or equal to `expected`.
///
/// ```rust
/// use checkwise::prelude::*;
///
/// assert!(ge(0).call(0).passed());
/// assert!(!ge(0).call(-1).passed());
/// assert!(ge("b").call("c").passed());
/// ```
pub fn ge(expected: impl Into<Arg>) -> Expr {
    GE.hoist(Hoisted::new().arg(expected))
}

/// Subject is strictly greater than `expected`.
pub fn gt(expected: impl Into<Arg>) -> Expr {
    GT.hoist(Hoisted::new().arg(expected))
}

/// Subject is less than or equal to `expected`.
pub fn le(expected: impl Into<Arg>) -> Expr {
    LE.hoist(Hoisted::new().arg(expected))
}

/// Subject is strictly less than `expected`.
pub fn lt(expected: impl Into<Arg>) -> Expr {
    LT.hoist(Hoisted::new().arg(expected))
}

/// Subject is an element, key or substring of `container`.
///
/// ```rust
/// use checkwise::prelude::*;
/// use serde_json::json;
///
/// assert!(is_in(json!(["http", "https"])).call("https").passed());
/// assert!(!is_in(json!(["http", "https"])).call("ftp").passed());
/// ```
pub fn is_in(container: impl Into<Arg>) -> Expr {
    IS_IN.hoist(Hoisted::new().arg(container))
}

/// Subject container holds `expected` as an element, key or substring.
pub fn contains(expected: impl Into<Arg>) -> Expr {
    CONTAINS.hoist(Hoisted::new().arg(expected))
}

/// Subject is exactly of `kind`.
pub fn is_type(kind: Kind) -> Expr {
    IS_TYPE.hoist(Hoisted::new().arg(kind))
}

/// Subject is of `kind`, where [`Kind::Number`] covers both numeric kinds.
pub fn is_instance(kind: Kind) -> Expr {
    IS_INSTANCE.hoist(Hoisted::new().arg(kind))
}

/// Subject string matches `pattern` at its start.
///
/// The pattern is compiled once, here. An invalid pattern surfaces as
/// [`ValidatorError::InvalidPattern`](crate::ValidatorError) at evaluation,
/// captured like any other error.
pub fn matches(pattern: impl Into<String>) -> Expr {
    let pattern = pattern.into();
    let compiled = Regex::new(&pattern).map_err(ValidatorError::from);
    BasicFn::new("matches", Arity::exact(2), move |args| {
        let regex = compiled.as_ref().map_err(Clone::clone)?;
        Ok(regex
            .find(args.str_at(1)?)
            .is_some_and(|found| found.start() == 0))
    })
    .hoist(Hoisted::new().arg(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn orderings() {
        assert!(gt(1).call(2).passed());
        assert!(!gt(1).call(1).passed());
        assert!(le(1).call(1).passed());
        assert!(lt(1).call(0.5).passed());
        assert!(!lt(1).call(1.0).passed());
    }

    #[test]
    fn eq_is_loose_on_numbers() {
        assert!(eq(1).call(1.0).passed());
        assert!(eq("a").call("a").passed());
        assert!(!eq("1").call(1).passed());
        assert_eq!(eq(1).call(2).statement(), "eq(1, 2)");
    }

    #[test]
    fn comparing_incompatible_kinds_fails_with_reason() {
        let v = ge(0).call("zero");
        assert!(!v.passed());
        assert_eq!(
            v.statement(),
            "ge(0, \"zero\"), cannot order string against integer"
        );
    }

    #[test]
    fn hoisting_the_same_base_is_independent() {
        let low = ge(0);
        let high = ge(100);
        assert!(low.call(50).passed());
        assert!(!high.call(50).passed());
        assert!(low.call(50).passed());
    }

    #[test]
    fn membership_both_directions() {
        assert!(contains("b").call(json!(["a", "b"])).passed());
        assert!(contains("ell").call("hello").passed());
        assert!(contains("k").call(json!({"k": 1})).passed());
        assert!(!contains(3).call(json!([1, 2])).passed());
        assert!(is_in("hello").call("ell").passed());
        assert!(!is_in(5).call(5).passed());
    }

    #[test]
    fn type_checks() {
        assert!(is_type(Kind::Integer).call(1).passed());
        assert!(!is_type(Kind::Integer).call(1.5).passed());
        assert!(!is_type(Kind::Number).call(1).passed());
        assert!(is_instance(Kind::Number).call(1).passed());
        assert!(is_instance(Kind::Number).call(1.5).passed());
        assert!(is_instance(Kind::String).call("s").passed());
        assert!(!is_instance(Kind::Object).call(json!([])).passed());
    }

    #[test]
    fn matches_anchors_at_start() {
        assert!(matches(r"\d+").call("123abc").passed());
        assert!(!matches(r"\d+").call("abc123").passed());
        assert!(matches("a|bc").call("bcd").passed());
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = matches("(").call_strict("x").unwrap_err();
        assert!(matches!(err, ValidatorError::InvalidPattern(_)));
        assert!(!matches("(").call("x").passed());
    }

    #[test]
    fn compiled_pattern_is_shared_by_clones() {
        let digits = matches(r"\d+");
        let copy = digits.clone();
        assert!(digits.call("1a").passed());
        assert!(copy.call("22").passed());
        assert!(!copy.call("a1").passed());
        assert_eq!(copy.call("a1").statement(), "matches(\"\\\\d+\", \"a1\")");
    }
}
