//! Unpacker wrapper
//!
//! An unpacker derives a sequence of values from its subject, for
//! combinators to validate one by one. It does no verdict wrapping and
//! captures nothing: failures come back as errors, usually
//! [`ValidatorError::Unpack`], and the enclosing combinator decides.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{Arity, Expr};
use crate::error::ValidatorResult;
use crate::value::{Args, Hoisted};

/// Lazily produced values from one unpacking.
pub type Unpacked = Box<dyn Iterator<Item = Value> + Send>;

type UnpackFn = Arc<dyn Fn(Args) -> ValidatorResult<Unpacked> + Send + Sync>;

/// A value producer waiting for its hoisting call.
///
/// # Example
///
/// ```rust
/// use checkwise::prelude::*;
/// use serde_json::Value;
///
/// let words = UnpackerFn::new("words", Arity::exact(1), |args| {
///     let text = args.str_at(0)?.to_string();
///     let words: Vec<Value> = text.split_whitespace().map(Value::from).collect();
///     let unpacked: Unpacked = Box::new(words.into_iter());
///     Ok(unpacked)
/// });
///
/// let short_words = every([words.hoist(Hoisted::new()), string_length_between(0, 4)]);
/// assert!(short_words.call("tidy up the yard").passed());
/// assert!(!short_words.call("tidy up the garden").passed());
/// ```
#[derive(Clone)]
pub struct UnpackerFn {
    name: &'static str,
    arity: Arity,
    func: UnpackFn,
}

impl UnpackerFn {
    /// Wrap a producer.
    pub fn new<F>(name: &'static str, arity: Arity, func: F) -> Self
    where
        F: Fn(Args) -> ValidatorResult<Unpacked> + Send + Sync + 'static,
    {
        Self {
            name,
            arity,
            func: Arc::new(func),
        }
    }

    /// First call: capture `hoisted`.
    pub fn unpacker(&self, hoisted: Hoisted) -> Unpacker {
        Unpacker {
            func: self.clone(),
            hoisted,
        }
    }

    /// First call, as an expression usable at the head of a combinator.
    pub fn hoist(&self, hoisted: Hoisted) -> Expr {
        Expr::Unpacker(self.unpacker(hoisted))
    }
}

impl fmt::Debug for UnpackerFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnpackerFn")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// An unpacker with its hoisted arguments.
#[derive(Debug, Clone)]
pub struct Unpacker {
    func: UnpackerFn,
    hoisted: Hoisted,
}

impl Unpacker {
    /// Second call: produce the derived values for `args`.
    pub fn unpack(&self, args: impl Into<Args>) -> ValidatorResult<Unpacked> {
        let mut merged = self.hoisted.merge(args.into());
        merged.take_raise_error();
        self.func.arity.check(self.func.name, merged.len())?;
        (self.func.func)(merged)
    }

    /// Unpacker name.
    pub fn name(&self) -> &'static str {
        self.func.name
    }
}

impl fmt::Display for Unpacker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.func.name, self.hoisted)
    }
}
