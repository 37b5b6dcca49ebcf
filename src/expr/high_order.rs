//! High-order combinator wrapper
//!
//! Composes already-wrapped validators into one expression. Children are
//! evaluated lazily in declaration order and evaluation stops as soon as the
//! outcome is known.
//!
//! When an unpacker is attached (a leading [`Expr::Unpacker`] child, or the
//! combinator's default), the subject is unpacked first and the children are
//! applied to every derived value in turn, stopping at the first value that
//! fails.

use std::fmt;

use super::{ErrorPolicy, Expr, Unpacker};
use crate::error::{ValidatorError, ValidatorResult};
use crate::value::Args;
use crate::verdict::Verdict;

/// The logic a high-order expression applies to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Logical AND; returns the first failing verdict.
    Every,
    /// Logical OR; returns the first passing verdict.
    Either,
    /// Logical NOT over exactly one child.
    Neg,
    /// AND applied to every unpacked element.
    Each,
}

impl Combinator {
    /// Name used in statements and as verdict origin.
    pub fn name(self) -> &'static str {
        match self {
            Combinator::Every => "every",
            Combinator::Either => "either",
            Combinator::Neg => "neg",
            Combinator::Each => "each",
        }
    }
}

/// A combinator waiting for its list of children.
///
/// # Example
///
/// ```rust
/// use checkwise::prelude::*;
/// use serde_json::json;
///
/// // A combinator that walks container elements unless told otherwise.
/// let all_elements = HighOrderFn::new(Combinator::Every)
///     .with_default_unpacker(elements());
///
/// let non_negative = all_elements.hoist([ge(0)]);
/// assert!(non_negative.call(json!([0, 1, 2])).passed());
/// assert!(!non_negative.call(json!([0, -1, 2])).passed());
/// ```
#[derive(Debug, Clone)]
pub struct HighOrderFn {
    combinator: Combinator,
    default_unpacker: Option<Unpacker>,
}

impl HighOrderFn {
    /// A combinator applying children directly to the call arguments.
    pub fn new(combinator: Combinator) -> Self {
        Self {
            combinator,
            default_unpacker: None,
        }
    }

    /// Unpack the subject with `unpacker` unless the children start with one.
    pub fn with_default_unpacker(mut self, unpacker: Unpacker) -> Self {
        self.default_unpacker = Some(unpacker);
        self
    }

    /// First call: capture the children.
    ///
    /// A leading unpacker expression is taken out of the list and overrides
    /// the default unpacker.
    pub fn hoist(&self, children: impl IntoIterator<Item = Expr>) -> Expr {
        let mut children: Vec<Expr> = children.into_iter().collect();
        let explicit = match children.first() {
            Some(Expr::Unpacker(unpacker)) => Some(unpacker.clone()),
            _ => None,
        };
        let explicit_unpacker = explicit.is_some();
        if explicit_unpacker {
            children.remove(0);
        }

        Expr::HighOrder(HighOrder {
            combinator: self.combinator,
            unpacker: explicit.or_else(|| self.default_unpacker.clone()),
            explicit_unpacker,
            children,
        })
    }
}

/// A combinator with its children.
#[derive(Debug, Clone)]
pub struct HighOrder {
    combinator: Combinator,
    unpacker: Option<Unpacker>,
    explicit_unpacker: bool,
    children: Vec<Expr>,
}

impl HighOrder {
    /// Combinator name.
    pub fn name(&self) -> &'static str {
        self.combinator.name()
    }

    /// The combinator logic.
    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// The children, in evaluation order, without any leading unpacker.
    pub fn children(&self) -> &[Expr] {
        &self.children
    }

    pub(crate) fn evaluate(&self, args: Args, policy: ErrorPolicy) -> ValidatorResult<Verdict> {
        let name = self.name();
        let Some(unpacker) = &self.unpacker else {
            return self
                .apply(&args, policy)
                .or_else(|err| policy.capture(err, self.to_string(), name));
        };

        let values = match unpacker.unpack(args) {
            Ok(values) => values,
            Err(err) => return policy.capture(err, self.to_string(), name),
        };
        for value in values {
            let verdict = match self.apply(&Args::new().arg(value), policy) {
                Ok(verdict) => verdict,
                Err(err) => return policy.capture(err, self.to_string(), name),
            };
            if !verdict.passed() {
                #[cfg(feature = "tracing")]
                tracing::trace!(combinator = name, statement = verdict.statement(), "element failed");
                return Ok(verdict);
            }
        }
        Ok(Verdict::new(true, self.to_string(), name))
    }

    fn apply(&self, args: &Args, policy: ErrorPolicy) -> ValidatorResult<Verdict> {
        let name = self.name();
        match self.combinator {
            Combinator::Every | Combinator::Each => {
                let mut checked = Vec::with_capacity(self.children.len());
                for child in &self.children {
                    let verdict = child.run(args.clone(), policy)?;
                    if !verdict.passed() {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(combinator = name, child = child.name(), "short-circuit on failure");
                        return Ok(verdict);
                    }
                    checked.push(verdict);
                }
                Ok(Verdict::new(true, self.summary(&checked), name))
            }
            Combinator::Either => {
                let mut checked = Vec::with_capacity(self.children.len());
                for child in &self.children {
                    let verdict = child.run(args.clone(), policy)?;
                    if verdict.passed() {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(combinator = name, child = child.name(), "short-circuit on success");
                        return Ok(verdict);
                    }
                    checked.push(verdict);
                }
                Ok(Verdict::new(false, self.summary(&checked), name))
            }
            Combinator::Neg => {
                let [child] = self.children.as_slice() else {
                    return Err(ValidatorError::Arity {
                        name: name.to_string(),
                        expected: "1".to_string(),
                        given: self.children.len(),
                    });
                };
                let verdict = child.run(args.clone(), policy)?;
                Ok(Verdict::new(!verdict.passed(), verdict.to_string(), name))
            }
        }
    }

    /// `name(statement, ...)` over the verdicts of every child that ran.
    fn summary(&self, verdicts: &[Verdict]) -> String {
        let statements: Vec<&str> = verdicts.iter().map(Verdict::statement).collect();
        format!("{}({})", self.name(), statements.join(", "))
    }
}

impl fmt::Display for HighOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(self.children.len() + 1);
        if self.explicit_unpacker {
            if let Some(unpacker) = &self.unpacker {
                parts.push(unpacker.to_string());
            }
        }
        parts.extend(self.children.iter().map(|c| c.to_string()));
        write!(f, "{}({})", self.name(), parts.join(", "))
    }
}
