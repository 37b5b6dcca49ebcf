//! Ready-made validators, unpackers, lazy values and combinators
//!
//! Every function here performs the hoisting call and returns an
//! [`Expr`](crate::Expr) (or a [`Lazy`](crate::Lazy) value) ready for its
//! final call. The underlying wrappers are built once per process.

pub mod combinators;
pub mod compare;
pub mod lazy;
pub mod number;
pub mod string;
pub mod unpackers;

pub use combinators::{each, either, every, neg, value};
pub use compare::{contains, eq, ge, gt, is_in, is_instance, is_type, le, lt, matches};
pub use lazy::{now, today, tomorrow};
pub use number::{
    float_precision_magnitude_le, magnitude_and_precision, number_change_below, price_float_in,
};
pub use string::{
    as_url_contains_email, is_json, is_url, non_empty_string, non_empty_string_without_whitespace,
    string_bits_length_between, string_diff_below, string_length_between,
};
pub use unpackers::{elements, extract_attribute, extract_elements, load_json, parse_url};
