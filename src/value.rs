//! Dynamic values and argument lists
//!
//! Validators work over [`serde_json::Value`], so containers, parsed JSON,
//! URL parts and serialized structs all flow through the same expressions.
//!
//! Arguments travel in two shapes:
//!
//! - [`Hoisted`]: captured at construction time, may hold [`Lazy`] values.
//! - [`Args`]: concrete values, supplied at evaluation time and handed to
//!   predicates after merging with the hoisted ones.
//!
//! # Example
//!
//! ```rust
//! use checkwise::{Args, Kind};
//! use serde_json::json;
//!
//! let args = Args::from(json!([1, 2])).kwarg("unit", "bits");
//! assert_eq!(args.to_string(), "[1,2], unit=\"bits\"");
//! assert_eq!(Kind::of(&json!(2.5)), Kind::Float);
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ValidatorError, ValidatorResult};
use crate::expr::Lazy;

/// Reserved keyword selecting the error policy at the final call.
pub const RAISE_ERROR: &str = "raise_error";

/// The shape of a dynamic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// JSON `null`.
    Null,
    /// `true` or `false`.
    Bool,
    /// A number without a fractional representation.
    Integer,
    /// A floating point number.
    Float,
    /// Either `Integer` or `Float`. Never returned by [`Kind::of`].
    Number,
    /// A string.
    String,
    /// An ordered list.
    Array,
    /// A key/value mapping.
    Object,
}

impl Kind {
    /// The exact kind of `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(n) if n.is_f64() => Kind::Float,
            Value::Number(_) => Kind::Integer,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    /// Instance check: like equality, except `Number` admits both numeric kinds.
    pub fn admits(self, value: &Value) -> bool {
        let actual = Kind::of(value);
        match self {
            Kind::Number => matches!(actual, Kind::Integer | Kind::Float),
            other => other == actual,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = ValidatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(Kind::Null),
            "bool" => Ok(Kind::Bool),
            "integer" => Ok(Kind::Integer),
            "float" => Ok(Kind::Float),
            "number" => Ok(Kind::Number),
            "string" => Ok(Kind::String),
            "array" => Ok(Kind::Array),
            "object" => Ok(Kind::Object),
            other => Err(ValidatorError::predicate(format!("unknown kind '{other}'"))),
        }
    }
}

impl From<Kind> for Value {
    fn from(kind: Kind) -> Self {
        Value::String(kind.name().to_string())
    }
}

/// A hoisted argument: a concrete value or a value computed per evaluation.
#[derive(Debug, Clone)]
pub enum Arg {
    /// Fixed at construction.
    Value(Value),
    /// Resolved fresh every time the owning expression is evaluated.
    Lazy(Lazy),
}

impl Arg {
    fn resolve(&self) -> Value {
        match self {
            Arg::Value(value) => value.clone(),
            Arg::Lazy(lazy) => lazy.resolve(),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(value) => write!(f, "{value}"),
            Arg::Lazy(lazy) => write!(f, "{lazy}"),
        }
    }
}

impl From<Lazy> for Arg {
    fn from(lazy: Lazy) -> Self {
        Arg::Lazy(lazy)
    }
}

/// Arguments captured by a hoisting call.
///
/// Immutable once built; [`Hoisted::extend`] returns a new value.
#[derive(Debug, Clone, Default)]
pub struct Hoisted {
    positional: Vec<Arg>,
    keywords: BTreeMap<String, Arg>,
}

impl Hoisted {
    /// No hoisted arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.positional.push(arg.into());
        self
    }

    /// Set a keyword argument.
    pub fn kwarg(mut self, key: impl Into<String>, arg: impl Into<Arg>) -> Self {
        self.keywords.insert(key.into(), arg.into());
        self
    }

    /// A copy with `args` appended to the positionals and merged into the keywords.
    pub fn extend(&self, args: Args) -> Self {
        let mut next = self.clone();
        next.positional
            .extend(args.positional.into_iter().map(Arg::Value));
        for (key, value) in args.keywords {
            next.keywords.insert(key, Arg::Value(value));
        }
        next
    }

    /// Number of hoisted positional arguments.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// True when nothing was hoisted.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    /// Resolve lazies and merge with the arguments of the final call.
    ///
    /// Hoisted positionals come first. Hoisted keywords win over call keywords.
    pub(crate) fn merge(&self, call: Args) -> Args {
        let mut positional: Vec<Value> = self.positional.iter().map(Arg::resolve).collect();
        positional.extend(call.positional);
        let mut keywords = call.keywords;
        for (key, arg) in &self.keywords {
            keywords.insert(key.clone(), arg.resolve());
        }
        Args {
            positional,
            keywords,
        }
    }
}

impl fmt::Display for Hoisted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(
            f,
            self.positional.iter().map(|a| a.to_string()),
            self.keywords.iter().map(|(k, a)| format!("{k}={a}")),
        )
    }
}

/// Concrete arguments for the evaluation call.
///
/// Built from a single value via `From`, from a pair or triple of values, or
/// with the [`arg`](Args::arg) / [`kwarg`](Args::kwarg) builders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keywords: BTreeMap<String, Value>,
}

impl Args {
    /// No arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument.
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(key.into(), value.into());
        self
    }

    /// Serialize any value into a single positional argument.
    ///
    /// Struct fields become object keys, which is what
    /// [`extract_attribute`](crate::library::extract_attribute) reads.
    pub fn serialize<T: Serialize>(value: &T) -> ValidatorResult<Self> {
        serde_json::to_value(value)
            .map(|v| Self::new().arg(v))
            .map_err(|e| ValidatorError::predicate(e.to_string()))
    }

    /// Positional arguments in order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Keyword arguments.
    pub fn keywords(&self) -> &BTreeMap<String, Value> {
        &self.keywords
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// True when there are no positional or keyword arguments.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    /// Positional argument at `index`.
    pub fn get(&self, index: usize) -> ValidatorResult<&Value> {
        self.positional
            .get(index)
            .ok_or_else(|| ValidatorError::MissingArgument(format!("#{index}")))
    }

    /// Keyword argument named `key`.
    pub fn keyword(&self, key: &str) -> Option<&Value> {
        self.keywords.get(key)
    }

    /// Positional argument at `index`, which must be a string.
    pub fn str_at(&self, index: usize) -> ValidatorResult<&str> {
        let value = self.get(index)?;
        value
            .as_str()
            .ok_or_else(|| ValidatorError::type_mismatch(Kind::String.to_string(), value))
    }

    /// Positional argument at `index`, which must be a number.
    pub fn f64_at(&self, index: usize) -> ValidatorResult<f64> {
        as_f64(self.get(index)?)
    }

    /// Remove the reserved `raise_error` keyword, returning its truthiness.
    pub(crate) fn take_raise_error(&mut self) -> bool {
        self.keywords
            .remove(RAISE_ERROR)
            .is_some_and(|flag| is_truthy(&flag))
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(
            f,
            self.positional.iter().map(|v| v.to_string()),
            self.keywords.iter().map(|(k, v)| format!("{k}={v}")),
        )
    }
}

fn write_list(
    f: &mut fmt::Formatter<'_>,
    positional: impl Iterator<Item = String>,
    keywords: impl Iterator<Item = String>,
) -> fmt::Result {
    let items: Vec<String> = positional.chain(keywords).collect();
    f.write_str(&items.join(", "))
}

macro_rules! impl_value_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Value(Value::from(value))
                }
            }

            impl From<$ty> for Args {
                fn from(value: $ty) -> Self {
                    Args::new().arg(value)
                }
            }
        )*
    };
}

impl_value_conversions!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, &str, Value, Kind,
);

impl From<&Value> for Args {
    fn from(value: &Value) -> Self {
        Args::new().arg(value.clone())
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Args {
    fn from((a, b): (A, B)) -> Self {
        Args::new().arg(a).arg(b)
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Args {
    fn from((a, b, c): (A, B, C)) -> Self {
        Args::new().arg(a).arg(b).arg(c)
    }
}

/// Numeric view of `value`.
pub fn as_f64(value: &Value) -> ValidatorResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| ValidatorError::type_mismatch(Kind::Number.to_string(), value))
}

/// Truthiness in the usual dynamic-language sense: empty and zero are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Equality where numbers compare by value, so `1 == 1.0`.
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => {
            matches!(compare(left, right), Ok(Ordering::Equal))
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, x)| b.get(k).is_some_and(|y| loose_eq(x, y)))
        }
        _ => left == right,
    }
}

/// Order two values of compatible kinds.
///
/// Numbers compare numerically, strings and booleans naturally, arrays
/// element by element. Anything else cannot be ordered.
pub fn compare(left: &Value, right: &Value) -> ValidatorResult<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                return Ok(x.cmp(&y));
            }
            if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
                return Ok(x.cmp(&y));
            }
            let (x, y) = (as_f64(left)?, as_f64(right)?);
            x.partial_cmp(&y).ok_or_else(|| unordered(left, right))
        }
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
        (Value::Array(a), Value::Array(b)) => {
            for (x, y) in a.iter().zip(b) {
                match compare(x, y)? {
                    Ordering::Equal => continue,
                    other => return Ok(other),
                }
            }
            Ok(a.len().cmp(&b.len()))
        }
        _ => Err(unordered(left, right)),
    }
}

fn unordered(left: &Value, right: &Value) -> ValidatorError {
    ValidatorError::predicate(format!(
        "cannot order {} against {}",
        Kind::of(left),
        Kind::of(right)
    ))
}

/// Whether `item` is a member of `container`.
///
/// Arrays test element equality, objects test keys, strings test substrings.
pub fn membership(container: &Value, item: &Value) -> ValidatorResult<bool> {
    match container {
        Value::Array(items) => Ok(items.iter().any(|x| loose_eq(x, item))),
        Value::Object(map) => Ok(item.as_str().is_some_and(|key| map.contains_key(key))),
        Value::String(haystack) => match item {
            Value::String(needle) => Ok(haystack.contains(needle.as_str())),
            other => Err(ValidatorError::type_mismatch(
                "string as left operand of 'in <string>'",
                other,
            )),
        },
        other => Err(ValidatorError::type_mismatch("container", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_of_distinguishes_numbers() {
        assert_eq!(Kind::of(&json!(1)), Kind::Integer);
        assert_eq!(Kind::of(&json!(1.0)), Kind::Float);
        assert_eq!(Kind::of(&json!("x")), Kind::String);
        assert!(Kind::Number.admits(&json!(1)));
        assert!(Kind::Number.admits(&json!(1.5)));
        assert!(!Kind::Number.admits(&json!("1")));
        assert!(!Kind::Integer.admits(&json!(1.5)));
    }

    #[test]
    fn kind_round_trips_through_its_name() {
        for kind in [Kind::Null, Kind::Float, Kind::Number, Kind::Object] {
            assert_eq!(kind.to_string().parse::<Kind>(), Ok(kind));
        }
        assert!("tuple".parse::<Kind>().is_err());
    }

    #[test]
    fn compare_numbers_across_representations() {
        assert_eq!(compare(&json!(1), &json!(1.0)), Ok(Ordering::Equal));
        assert_eq!(compare(&json!(-1), &json!(2)), Ok(Ordering::Less));
        assert_eq!(compare(&json!(2.5), &json!(2)), Ok(Ordering::Greater));
        assert_eq!(
            compare(&json!(u64::MAX), &json!(-1)),
            Ok(Ordering::Greater)
        );
    }

    #[test]
    fn compare_strings_and_arrays() {
        assert_eq!(compare(&json!("a"), &json!("b")), Ok(Ordering::Less));
        assert_eq!(compare(&json!([1, 2]), &json!([1, 3])), Ok(Ordering::Less));
        assert_eq!(compare(&json!([1, 2]), &json!([1])), Ok(Ordering::Greater));
    }

    #[test]
    fn compare_mismatched_kinds_fails() {
        let err = compare(&json!(1), &json!("1")).unwrap_err();
        assert_eq!(err.to_string(), "cannot order integer against string");
        assert!(compare(&json!(null), &json!(null)).is_err());
    }

    #[test]
    fn loose_eq_nested() {
        assert!(loose_eq(&json!({"a": [1, 2.0]}), &json!({"a": [1.0, 2]})));
        assert!(!loose_eq(&json!({"a": 1}), &json!({"b": 1})));
        assert!(!loose_eq(&json!("1"), &json!(1)));
    }

    #[test]
    fn membership_by_container_kind() {
        assert_eq!(membership(&json!([1, 2]), &json!(2.0)), Ok(true));
        assert_eq!(membership(&json!({"k": 0}), &json!("k")), Ok(true));
        assert_eq!(membership(&json!({"k": 0}), &json!(0)), Ok(false));
        assert_eq!(membership(&json!("haystack"), &json!("st")), Ok(true));
        assert!(membership(&json!("haystack"), &json!(1)).is_err());
        assert!(membership(&json!(5), &json!(5)).is_err());
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(0.1)));
    }

    #[test]
    fn merge_puts_hoisted_first_and_hoisted_keywords_win() {
        let hoisted = Hoisted::new().arg(1).kwarg("unit", "bits");
        let call = Args::new().arg(2).kwarg("unit", "bytes").kwarg("x", true);
        let merged = hoisted.merge(call);
        assert_eq!(merged.positional(), &[json!(1), json!(2)]);
        assert_eq!(merged.keyword("unit"), Some(&json!("bits")));
        assert_eq!(merged.keyword("x"), Some(&json!(true)));
    }

    #[test]
    fn extend_does_not_touch_the_original() {
        let base = Hoisted::new().arg(0);
        let extended = base.extend(Args::from(5));
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
    }

    #[test]
    fn take_raise_error_strips_the_keyword() {
        let mut args = Args::from(1).kwarg(RAISE_ERROR, true);
        assert!(args.take_raise_error());
        assert!(args.keyword(RAISE_ERROR).is_none());
        assert!(!args.take_raise_error());
    }

    #[test]
    fn display_renders_positionals_then_keywords() {
        let args = Args::from(("a", 1)).kwarg("k", 2.5);
        assert_eq!(args.to_string(), "\"a\", 1, k=2.5");
    }

    #[test]
    fn serialize_struct_into_object() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
        }
        let args = Args::serialize(&Point { x: 3 }).unwrap();
        assert_eq!(args.positional(), &[json!({"x": 3})]);
    }
}
