//! Human-readable value formatting (en-GB conventions).

use crate::resolve::ValueFormat;

const NOT_AVAILABLE: &str = "n/a";

/// Rounds half towards positive infinity.
fn round(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Integer part of `value`, rounded, with `,` thousands separators.
#[allow(clippy::cast_possible_truncation)]
fn grouped(value: f64) -> String {
    let rounded = round(value) as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `value` to `digits` decimals, ties rounded away from zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn fixed(value: f64, digits: usize) -> String {
    let scale = 10_f64.powi(digits as i32);
    let rounded = round(value.abs() * scale) / scale;
    let rounded = if value.is_sign_negative() { -rounded } else { rounded };
    format!("{rounded:.digits$}")
}

fn trim_point_zero(s: String) -> String {
    match s.strip_suffix(".0") {
        Some(trimmed) => trimmed.to_string(),
        None => s,
    }
}

/// `1,250`, or `n/a` when not finite.
#[must_use]
pub fn format_count(value: f64) -> String {
    if value.is_finite() {
        grouped(value)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// Optional variant of [`format_count`].
#[must_use]
pub fn format_count_opt(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format_count)
}

/// `1,250`, or `0` when not finite.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_finite() {
        grouped(value)
    } else {
        "0".to_string()
    }
}

#[must_use]
pub fn format_number_opt(value: Option<f64>) -> String {
    format_number(value.unwrap_or(f64::NAN))
}

/// `£1,250,000`, or `n/a`.
#[must_use]
pub fn format_currency(value: f64) -> String {
    if value.is_finite() {
        format!("£{}", grouped(value))
    } else {
        NOT_AVAILABLE.to_string()
    }
}

#[must_use]
pub fn format_currency_opt(value: Option<f64>) -> String {
    format_currency(value.unwrap_or(f64::NAN))
}

/// `£2.5m` for values of a million or more, otherwise [`format_currency`].
#[must_use]
pub fn format_currency_compact(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if value.abs() >= 1_000_000.0 {
        return format!("£{}m", trim_point_zero(fixed(value / 1_000_000.0, 1)));
    }
    format_currency(value)
}

/// `£12m`, `£2.5m`, `£250k`, `£7.5k`, else [`format_currency`].
///
/// One decimal below ten units, none above.
#[must_use]
pub fn format_currency_short(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let scaled = |divisor: f64, suffix: char| {
        let v = value / divisor;
        let digits = if v >= 10.0 { 0 } else { 1 };
        format!("£{}{suffix}", trim_point_zero(fixed(v, digits)))
    };
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        scaled(1_000_000.0, 'm')
    } else if magnitude >= 1_000.0 {
        scaled(1_000.0, 'k')
    } else {
        format_currency(value)
    }
}

/// `12.50%` for two digits; non-finite values read `0%`.
#[must_use]
pub fn format_percent(value: f64, digits: usize) -> String {
    if value.is_finite() {
        format!("{}%", fixed(value, digits))
    } else {
        "0%".to_string()
    }
}

/// Signed percentage change: `+12.5%`, `-3.0%`, or `n/a`.
#[must_use]
pub fn format_change(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{}%", fixed(value, digits))
}

#[must_use]
pub fn format_change_opt(value: Option<f64>) -> String {
    format_change(value.unwrap_or(f64::NAN), 1)
}

/// Formats a legend threshold or headline value in the metric's style.
#[must_use]
pub fn format_value(format: ValueFormat, value: f64) -> String {
    match format {
        ValueFormat::Currency => format_currency(value),
        ValueFormat::CurrencyShort => format_currency_short(value),
        ValueFormat::Count => format_count(value),
        ValueFormat::Percent => format_percent(value, 1),
    }
}
