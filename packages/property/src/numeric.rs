//! Numeric coercion for untrusted property values.
//!
//! Source spreadsheets arrive as a mix of JSON numbers, strings with
//! thousands separators, blanks and nulls. Every numeric read goes through
//! [`to_number`] so that anything unusable becomes `None` instead of a
//! bogus zero or `NaN`.

use serde_json::Value;

/// Coerces a JSON value into a finite number.
///
/// * `null` and non-finite numbers become `None`.
/// * Strings have `,` separators and surrounding whitespace removed; an
///   empty remainder or an unparseable/non-finite number becomes `None`.
/// * Booleans, arrays and objects become `None`.
#[must_use]
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_decimal(s),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Like [`to_number`], with `None` mapped to `0.0`.
///
/// Only for fields where a missing value is a genuine zero contribution
/// (council tax band counts).
#[must_use]
pub fn to_number_or_zero(value: &Value) -> f64 {
    to_number(value).unwrap_or(0.0)
}

/// Parses a decimal string such as `" 1,234.5 "`.
#[must_use]
pub fn parse_decimal(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads and coerces `key` from a property object. Absent keys are `None`.
#[must_use]
pub fn field(props: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    props.get(key).and_then(to_number)
}
