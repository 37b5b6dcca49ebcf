//! String validators, including the composed `is_json` and `is_url` checks.

use std::sync::LazyLock;

use regex::Regex;
use similar::TextDiff;
use url::Url;

use super::combinators::every;
use super::compare::{is_in, is_instance};
use super::unpackers::{extract_attribute, load_json, parse_url};
use crate::expr::{Arity, BasicFn, Expr};
use crate::value::{is_truthy, Arg, Hoisted, Kind};

static EMAIL_IN_URL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("hard-coded pattern is valid")
});

static STRING_DIFF_BELOW: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("string_diff_below", Arity::exact(3), |args| {
        let threshold = args.f64_at(0)?;
        if !is_truthy(args.get(2)?) {
            return Ok(true);
        }
        let ratio = TextDiff::from_chars(args.str_at(1)?, args.str_at(2)?).ratio();
        Ok(1.0 - f64::from(ratio) < threshold)
    })
});

static STRING_LENGTH_BETWEEN: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("string_length_between", Arity::exact(3), |args| {
        let (min, max) = (args.f64_at(0)?, args.f64_at(1)?);
        let Some(text) = args.get(2)?.as_str() else {
            return Ok(false);
        };
        let bits = args.keyword("unit").and_then(|u| u.as_str()) == Some("bits");
        let len = (text.len() * if bits { 8 } else { 1 }) as f64;
        Ok(min <= len && len <= max)
    })
});

static NON_EMPTY_STRING: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("non_empty_string", Arity::exact(1), |args| {
        Ok(args.get(0)?.as_str().is_some_and(|s| !s.is_empty()))
    })
});

static NON_EMPTY_STRING_WITHOUT_WHITESPACE: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("non_empty_string_without_whitespace", Arity::exact(1), |args| {
        Ok(args
            .get(0)?
            .as_str()
            .is_some_and(|s| !s.chars().any(char::is_whitespace)))
    })
});

static AS_URL_CONTAINS_EMAIL: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("as_url_contains_email", Arity::exact(1), |args| {
        let text = args.str_at(0)?;
        Ok(Url::parse(text).is_ok() && EMAIL_IN_URL.is_match(text))
    })
});

static IS_JSON: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("is_json", Arity::exact(1), |args| {
        Ok(every([load_json()]).call(args.get(0)?).passed())
    })
});

static URL_SHAPE: LazyLock<Expr> = LazyLock::new(|| {
    every([
        parse_url(),
        every([
            extract_attribute("scheme"),
            is_instance(Kind::String),
            is_in(serde_json::json!(["http", "https"])),
        ]),
        every([
            extract_attribute("netloc"),
            non_empty_string_without_whitespace(),
        ]),
    ])
});

static IS_URL: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("is_url", Arity::exact(1), |args| {
        Ok(URL_SHAPE.call(args.get(0)?).passed())
    })
});

/// Subject args `(new, old)` differ by less than `threshold`.
///
/// Difference is `1 - similarity ratio`, so `0.0` means identical. An empty
/// or missing `old` always passes.
///
/// The ratio is `2 * matches / total_chars` over a character-level Myers
/// diff. It is not the Ratcliff/Obershelp score of Python's `difflib`, and
/// the two can disagree on strings with repeated or transposed blocks.
///
/// ```rust
/// use checkwise::prelude::*;
///
/// let small_edit = string_diff_below(0.2);
/// assert!(small_edit.call(("hello world", "hello world!")).passed());
/// assert!(!small_edit.call(("hello", "goodbye")).passed());
/// assert!(small_edit.call(("anything", "")).passed());
/// ```
pub fn string_diff_below(threshold: f64) -> Expr {
    STRING_DIFF_BELOW.hoist(Hoisted::new().arg(threshold))
}

/// Subject is a string whose UTF-8 byte length is within `[min, max]`.
///
/// Non-strings fail.
pub fn string_length_between(min: impl Into<Arg>, max: impl Into<Arg>) -> Expr {
    STRING_LENGTH_BETWEEN.hoist(Hoisted::new().arg(min).arg(max))
}

/// Like [`string_length_between`], counting bits instead of bytes.
pub fn string_bits_length_between(min: impl Into<Arg>, max: impl Into<Arg>) -> Expr {
    STRING_LENGTH_BETWEEN.hoist(Hoisted::new().arg(min).arg(max).kwarg("unit", "bits"))
}

/// Subject is a string with at least one character.
pub fn non_empty_string() -> Expr {
    NON_EMPTY_STRING.hoist(Hoisted::new())
}

/// Subject is a string without whitespace. The empty string passes.
pub fn non_empty_string_without_whitespace() -> Expr {
    NON_EMPTY_STRING_WITHOUT_WHITESPACE.hoist(Hoisted::new())
}

/// Subject parses as a URL and looks like `local@domain.tld` from its start.
pub fn as_url_contains_email() -> Expr {
    AS_URL_CONTAINS_EMAIL.hoist(Hoisted::new())
}

/// Subject is a string holding well-formed JSON.
pub fn is_json() -> Expr {
    IS_JSON.hoist(Hoisted::new())
}

/// Subject is an http(s) URL with a non-empty, whitespace-free authority.
///
/// ```rust
/// use checkwise::prelude::*;
///
/// assert!(is_url().call("https://example.com/x").passed());
/// assert!(!is_url().call("ftp://x").passed());
/// ```
pub fn is_url() -> Expr {
    IS_URL.hoist(Hoisted::new())
}
