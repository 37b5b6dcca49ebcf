//! Deferred values recomputed on every evaluation.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

type Producer = Arc<dyn Fn() -> Value + Send + Sync>;

/// A value computed fresh each time an expression that hoisted it runs.
///
/// # Example
///
/// ```rust
/// use checkwise::prelude::*;
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use std::sync::Arc;
///
/// let counter = Arc::new(AtomicI64::new(0));
/// let ticks = counter.clone();
/// let next = Lazy::new("next", move || (ticks.fetch_add(1, Ordering::SeqCst) + 1).into());
///
/// let above_next = gt(next);
/// assert!(!above_next.call(1).passed()); // 1 > 1
/// assert!(above_next.call(3).passed()); // 3 > 2
/// ```
#[derive(Clone)]
pub struct Lazy {
    name: &'static str,
    producer: Producer,
}

impl Lazy {
    /// Wrap a zero-argument producer.
    pub fn new<F>(name: &'static str, producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            name,
            producer: Arc::new(producer),
        }
    }

    /// Run the producer.
    pub fn resolve(&self) -> Value {
        (self.producer)()
    }

    /// Name used in statements.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy").field("name", &self.name).finish()
    }
}

impl fmt::Display for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}()", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn resolve_runs_the_producer_every_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let lazy = Lazy::new("count", move || seen.fetch_add(1, Ordering::SeqCst).into());

        assert_eq!(lazy.resolve(), Value::from(0));
        assert_eq!(lazy.resolve(), Value::from(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn display_shows_a_call() {
        let lazy = Lazy::new("today", || Value::Null);
        assert_eq!(lazy.to_string(), "today()");
    }
}
