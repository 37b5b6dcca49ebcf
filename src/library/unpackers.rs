//! Unpackers deriving values from a subject
//!
//! Used at the head of a combinator, an unpacker replaces the subject with
//! the values it yields:
//!
//! ```rust
//! use checkwise::prelude::*;
//!
//! let adult = every([load_json(), extract_attribute("age"), ge(18)]);
//! assert!(adult.call(r#"{"age": 30}"#).passed());
//! assert!(!adult.call(r#"{"age": 12}"#).passed());
//! ```
//!
//! Only the leading unpacker is applied. Nested unpacking needs a nested
//! combinator, as in `is_url`.

use std::sync::LazyLock;

use serde_json::{json, Map, Value};
use url::{Position, Url};

use crate::error::ValidatorError;
use crate::expr::{Arity, Expr, Unpacked, Unpacker, UnpackerFn};
use crate::value::{Hoisted, Kind};

/// Keyword naming the key read by [`extract_attribute`].
const SPECIFIED_KEY: &str = "specified_key";

static EXTRACT_ELEMENTS: LazyLock<UnpackerFn> = LazyLock::new(|| {
    UnpackerFn::new("extract_elements", Arity::exact(1), |args| {
        let container = args.get(0)?;
        let elements: Vec<Value> = match container {
            Value::Array(items) => items.clone(),
            Value::Object(map) => map.values().cloned().collect(),
            Value::String(text) => text.chars().map(|c| Value::from(c.to_string())).collect(),
            other => {
                return Err(ValidatorError::unpack(format!(
                    "can't extract elements from {}, val {other}",
                    Kind::of(other)
                )))
            }
        };
        let unpacked: Unpacked = Box::new(elements.into_iter());
        Ok(unpacked)
    })
});

static PARSE_URL: LazyLock<UnpackerFn> = LazyLock::new(|| {
    UnpackerFn::new("parse_url", Arity::exact(1), |args| {
        let text = args.str_at(0)?;
        let url = Url::parse(text)
            .map_err(|err| ValidatorError::unpack(format!("can't parse url '{text}': {err}")))?;
        let unpacked: Unpacked = Box::new(std::iter::once(url_parts(&url)));
        Ok(unpacked)
    })
});

static LOAD_JSON: LazyLock<UnpackerFn> = LazyLock::new(|| {
    UnpackerFn::new("load_json", Arity::exact(1), |args| {
        let text = args.str_at(0)?;
        let parsed: Value = serde_json::from_str(text).map_err(|_| {
            ValidatorError::unpack(format!("can't load json from string, val '{text}'"))
        })?;
        let unpacked: Unpacked = Box::new(std::iter::once(parsed));
        Ok(unpacked)
    })
});

static EXTRACT_ATTRIBUTE: LazyLock<UnpackerFn> = LazyLock::new(|| {
    UnpackerFn::new("extract_attribute", Arity::exact(1), |args| {
        let key = args
            .keyword(SPECIFIED_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| ValidatorError::MissingArgument(SPECIFIED_KEY.to_string()))?;
        let container = args.get(0)?;
        let value = container
            .as_object()
            .and_then(|map| map.get(key))
            .cloned()
            .ok_or_else(|| {
                ValidatorError::unpack(format!(
                    "container {} does not have '{key}'",
                    Kind::of(container)
                ))
            })?;
        let unpacked: Unpacked = Box::new(std::iter::once(value));
        Ok(unpacked)
    })
});

/// Splits `url` into the components `is_url` and friends inspect.
///
/// `params` is the `;`-suffix of the last path segment, which is removed from
/// `path`.
fn url_parts(url: &Url) -> Value {
    let full_path = url.path();
    let last_segment = full_path.rfind('/').map_or(0, |i| i + 1);
    let (path, params) = match full_path[last_segment..].find(';') {
        Some(at) => {
            let split = last_segment + at;
            (&full_path[..split], &full_path[split + 1..])
        }
        None => (full_path, ""),
    };

    let mut parts = Map::new();
    parts.insert("scheme".into(), json!(url.scheme()));
    parts.insert(
        "netloc".into(),
        json!(&url[Position::BeforeUsername..Position::AfterPort]),
    );
    parts.insert("host".into(), json!(url.host_str().unwrap_or_default()));
    parts.insert("path".into(), json!(path));
    parts.insert("params".into(), json!(params));
    parts.insert("query".into(), json!(url.query().unwrap_or_default()));
    parts.insert("fragment".into(), json!(url.fragment().unwrap_or_default()));
    Value::Object(parts)
}

/// Elements of an array, values of an object, or characters of a string.
pub fn extract_elements() -> Expr {
    EXTRACT_ELEMENTS.hoist(Hoisted::new())
}

/// [`extract_elements`] as a bare unpacker, for combinator defaults.
pub fn elements() -> Unpacker {
    EXTRACT_ELEMENTS.unpacker(Hoisted::new())
}

/// One object with `scheme`, `netloc`, `host`, `path`, `params`, `query` and
/// `fragment` of the subject URL.
pub fn parse_url() -> Expr {
    PARSE_URL.hoist(Hoisted::new())
}

/// The value parsed from the subject JSON string.
pub fn load_json() -> Expr {
    LOAD_JSON.hoist(Hoisted::new())
}

/// The value under `key` in the subject object.
pub fn extract_attribute(key: impl Into<String>) -> Expr {
    EXTRACT_ATTRIBUTE.hoist(Hoisted::new().kwarg(SPECIFIED_KEY, key.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpack(expr: Expr, subject: Value) -> Result<Vec<Value>, ValidatorError> {
        let unpacker = expr.as_unpacker().cloned().ok_or_else(|| {
            ValidatorError::predicate(format!("{} is not an unpacker", expr.name()))
        })?;
        Ok(unpacker.unpack(subject)?.collect())
    }

    #[test]
    fn elements_of_containers() {
        assert_eq!(
            unpack(extract_elements(), json!([1, 2])).unwrap(),
            vec![json!(1), json!(2)]
        );
        assert_eq!(
            unpack(extract_elements(), json!({"b": 1, "a": 2})).unwrap(),
            vec![json!(1), json!(2)]
        );
        assert_eq!(
            unpack(extract_elements(), json!("hé")).unwrap(),
            vec![json!("h"), json!("é")]
        );
    }

    #[test]
    fn scalars_have_no_elements() {
        let err = unpack(extract_elements(), json!(5)).unwrap_err();
        assert!(err.is_unpack());
        assert_eq!(err.to_string(), "can't extract elements from integer, val 5");
    }

    #[test]
    fn url_components() {
        let parts = unpack(
            parse_url(),
            json!("https://user:pw@example.com:8080/a/b;v=1?q=2#frag"),
        )
        .unwrap();
        assert_eq!(
            parts,
            vec![json!({
                "scheme": "https",
                "netloc": "user:pw@example.com:8080",
                "host": "example.com",
                "path": "/a/b",
                "params": "v=1",
                "query": "q=2",
                "fragment": "frag",
            })]
        );
    }

    #[test]
    fn unparsable_url() {
        let err = unpack(parse_url(), json!("not a url")).unwrap_err();
        assert!(err.is_unpack());
        let err = unpack(parse_url(), json!(3)).unwrap_err();
        assert!(matches!(err, ValidatorError::Type { .. }));
    }

    #[test]
    fn json_loading() {
        assert_eq!(
            unpack(load_json(), json!(r#"{"a": 1}"#)).unwrap(),
            vec![json!({"a": 1})]
        );
        let err = unpack(load_json(), json!("not json")).unwrap_err();
        assert_eq!(err.to_string(), "can't load json from string, val 'not json'");
        let err = unpack(load_json(), json!(null)).unwrap_err();
        assert!(matches!(err, ValidatorError::Type { .. }));
    }

    #[test]
    fn attribute_lookup() {
        assert_eq!(
            unpack(extract_attribute("a"), json!({"a": [1]})).unwrap(),
            vec![json!([1])]
        );
        assert!(unpack(extract_attribute("b"), json!({"a": 1}))
            .unwrap_err()
            .is_unpack());
        assert!(unpack(extract_attribute("a"), json!([1]))
            .unwrap_err()
            .is_unpack());
    }

    #[test]
    fn attribute_display_names_the_key() {
        assert_eq!(
            extract_attribute("a").to_string(),
            "extract_attribute(specified_key=\"a\")"
        );
    }
}
