//! Numeric drift and float shape validators.

use std::sync::LazyLock;

use crate::error::ValidatorError;
use crate::expr::{Arity, BasicFn, Expr};
use crate::value::{Arg, Hoisted, Kind};

/// Significant digits considered by [`magnitude_and_precision`].
const DIGIT_BUDGET: u32 = 14;

/// Keeps the relative change finite when the smaller value is zero.
const CHANGE_EPSILON: f64 = 1e-10;

static NUMBER_CHANGE_BELOW: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("number_change_below", Arity::exact(3), |args| {
        let threshold = args.f64_at(0)?;
        let (new, old) = (args.f64_at(1)?, args.f64_at(2)?);
        let delta = (old - new).abs();
        Ok(delta / (new.min(old) + CHANGE_EPSILON) < threshold)
    })
});

static PRICE_FLOAT_IN: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("price_float_in", Arity::exact(3), |args| {
        let percent = args.f64_at(0)?;
        let (old, new) = (args.f64_at(1)?, args.f64_at(2)?);
        if old == 0.0 || new == 0.0 {
            return Ok(true);
        }
        Ok((new - old).abs() / old < percent / 100.0)
    })
});

static FLOAT_PRECISION_MAGNITUDE_LE: LazyLock<BasicFn> = LazyLock::new(|| {
    BasicFn::new("float_precision_magnitude_le", Arity::exact(3), |args| {
        let (max_precision, max_magnitude) = (args.f64_at(0)?, args.f64_at(1)?);
        let value = args.get(2)?;
        let number = match value.as_f64() {
            Some(number) if Kind::of(value) == Kind::Float => number,
            _ => return Err(ValidatorError::type_mismatch(Kind::Float.to_string(), value)),
        };
        let (magnitude, precision) = magnitude_and_precision(number);
        Ok(f64::from(magnitude) <= max_magnitude && f64::from(precision) <= max_precision)
    })
});

/// Subject args `(new, old)` changed by less than `threshold`, relative to the smaller.
pub fn number_change_below(threshold: impl Into<Arg>) -> Expr {
    NUMBER_CHANGE_BELOW.hoist(Hoisted::new().arg(threshold))
}

/// Subject args `(old, new)` moved by less than `percent` percent of `old`.
///
/// A zero on either side always passes.
///
/// ```rust
/// use checkwise::prelude::*;
///
/// assert!(price_float_in(10).call((100, 109)).passed());
/// assert!(!price_float_in(10).call((100, 111)).passed());
/// assert!(price_float_in(10).call((0, 500)).passed());
/// ```
pub fn price_float_in(percent: impl Into<Arg>) -> Expr {
    PRICE_FLOAT_IN.hoist(Hoisted::new().arg(percent))
}

/// Subject is a float with at most `precision` fractional and `magnitude`
/// integral digits.
///
/// Non-floats are a type error, so integers fail even when they would fit.
///
/// ```rust
/// use checkwise::prelude::*;
///
/// assert!(float_precision_magnitude_le(2, 2).call(2.1).passed());
/// assert!(!float_precision_magnitude_le(2, 2).call(123.4).passed());
/// assert!(!float_precision_magnitude_le(2, 2).call(2).passed());
/// ```
pub fn float_precision_magnitude_le(precision: impl Into<Arg>, magnitude: impl Into<Arg>) -> Expr {
    FLOAT_PRECISION_MAGNITUDE_LE.hoist(Hoisted::new().arg(precision).arg(magnitude))
}

/// Digits before and after the decimal point of `number`.
///
/// ```text
///   12.001
///   ^^ ^^^
///   |   precision = 3
///   magnitude = 2
/// ```
///
/// The integral part of values below one counts as one digit. Only
/// [`DIGIT_BUDGET`] significant digits are examined: the fractional part is
/// rounded half-up to the remaining budget, so binary representation noise
/// (`2.1` is really `2.10000000000000008...`) does not inflate precision.
/// Values with at least that many integral digits report no precision.
/// Infinities and NaN report `(u32::MAX, 0)`, exceeding any magnitude bound.
pub fn magnitude_and_precision(number: f64) -> (u32, u32) {
    if !number.is_finite() {
        return (u32::MAX, 0);
    }
    let abs = number.abs();
    let int_part = abs.trunc();
    let magnitude = if int_part < 1.0 {
        1
    } else {
        integral_digits(int_part)
    };
    if magnitude >= DIGIT_BUDGET {
        return (magnitude, 0);
    }

    let frac_part = abs - int_part;
    let multiplier = 10u64.pow(DIGIT_BUDGET - magnitude);
    // Leading 1 keeps the fractional zeros right after the decimal point.
    let mut frac_digits = multiplier + (multiplier as f64 * frac_part + 0.5) as u64;
    while frac_digits % 10 == 0 {
        frac_digits /= 10;
    }
    (magnitude, decimal_digits(frac_digits) - 1)
}

fn integral_digits(int_part: f64) -> u32 {
    if int_part < 1e15 {
        decimal_digits(int_part as u64)
    } else {
        int_part.log10().floor() as u32 + 1
    }
}

fn decimal_digits(mut n: u64) -> u32 {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}
