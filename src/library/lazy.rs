//! Clock-based lazy values, read from local time on every evaluation.

use chrono::{Local, TimeDelta};
use serde_json::Value;

use crate::expr::Lazy;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current local time as an RFC 3339 string.
pub fn now() -> Lazy {
    Lazy::new("now", || Value::from(Local::now().to_rfc3339()))
}

/// Current local date, `YYYY-MM-DD`.
///
/// ```rust
/// use checkwise::prelude::*;
///
/// // ISO dates order correctly as strings.
/// let not_in_the_past = ge(today());
/// assert!(not_in_the_past.call("9999-12-31").passed());
/// assert!(!not_in_the_past.call("1970-01-01").passed());
/// ```
pub fn today() -> Lazy {
    Lazy::new("today", || {
        Value::from(Local::now().date_naive().format(DATE_FORMAT).to_string())
    })
}

/// Local date one day from now, `YYYY-MM-DD`.
pub fn tomorrow() -> Lazy {
    Lazy::new("tomorrow", || {
        let date = Local::now().date_naive() + TimeDelta::days(1);
        Value::from(date.format(DATE_FORMAT).to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate};

    fn date(value: Value) -> NaiveDate {
        NaiveDate::parse_from_str(value.as_str().unwrap(), DATE_FORMAT).unwrap()
    }

    #[test]
    fn dates_are_iso_formatted() {
        let today = date(today().resolve());
        let tomorrow = date(tomorrow().resolve());
        // midnight may pass between the two reads
        assert!((tomorrow - today).num_days() >= 1);
    }

    #[test]
    fn now_is_rfc3339_and_recomputed() {
        let first = now().resolve();
        let parsed = DateTime::parse_from_rfc3339(first.as_str().unwrap());
        assert!(parsed.is_ok());
        let later = now().resolve();
        assert!(later.as_str().unwrap() >= first.as_str().unwrap());
    }

    #[test]
    fn display_uses_the_name() {
        assert_eq!(tomorrow().to_string(), "tomorrow()");
    }
}
