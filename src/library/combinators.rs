//! Logical combinators over validator expressions.

use std::sync::LazyLock;

use super::unpackers::{elements, extract_attribute};
use crate::expr::{Combinator, Expr, HighOrderFn};

static EVERY: LazyLock<HighOrderFn> = LazyLock::new(|| HighOrderFn::new(Combinator::Every));

static EITHER: LazyLock<HighOrderFn> = LazyLock::new(|| HighOrderFn::new(Combinator::Either));

static NEG: LazyLock<HighOrderFn> = LazyLock::new(|| HighOrderFn::new(Combinator::Neg));

static EACH: LazyLock<HighOrderFn> =
    LazyLock::new(|| HighOrderFn::new(Combinator::Each).with_default_unpacker(elements()));

/// Passes when every child passes; otherwise the first failing verdict.
///
/// A leading unpacker replaces the subject with the values it yields.
pub fn every(children: impl IntoIterator<Item = Expr>) -> Expr {
    EVERY.hoist(children)
}

/// Passes with the first passing child; fails when none pass.
///
/// ```rust
/// use checkwise::prelude::*;
/// use serde_json::json;
///
/// let no_version_or_v2 = either([eq(json!(null)), eq(2)]);
/// assert!(no_version_or_v2.call(json!(null)).passed());
/// assert!(no_version_or_v2.call(2).passed());
/// assert!(!no_version_or_v2.call(1).passed());
/// ```
pub fn either(children: impl IntoIterator<Item = Expr>) -> Expr {
    EITHER.hoist(children)
}

/// Inverts `child`.
pub fn neg(child: Expr) -> Expr {
    NEG.hoist([child])
}

/// Applies the children to every element of the subject container.
///
/// ```rust
/// use checkwise::prelude::*;
/// use serde_json::json;
///
/// let all_non_negative = each([ge(0)]);
/// assert!(all_non_negative.call(json!([1, 2, 3])).passed());
///
/// let verdict = all_non_negative.call(json!([1, -2, 3]));
/// assert_eq!(verdict.statement(), "ge(0, -2)");
/// ```
pub fn each(children: impl IntoIterator<Item = Expr>) -> Expr {
    EACH.hoist(children)
}

/// Applies `validators` to the value under `key` of the subject object.
pub fn value(key: impl Into<String>, validators: impl IntoIterator<Item = Expr>) -> Expr {
    every(std::iter::once(extract_attribute(key)).chain(validators))
}
