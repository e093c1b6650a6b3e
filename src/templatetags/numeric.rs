//! Arithmetic filters over template values.
//!
//! Each filter has an `Option`-returning core (`try_*`) and a template
//! wrapper that falls back to the documented default.

use serde_json::Value;

/// Numeric view of a template value: numbers, or strings that parse as one.
#[must_use]
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

#[must_use]
pub fn try_div(value: &Value, divisor: &Value) -> Option<f64> {
    let v = as_f64(value)?;
    let d = as_f64(divisor)?;
    if d == 0.0 {
        return None;
    }
    Some(v / d)
}

/// `value / divisor`, or `value` unchanged when either side is not a
/// number or the divisor is zero.
#[must_use]
pub fn div(value: &Value, divisor: &Value) -> Value {
    try_div(value, divisor)
        .and_then(|q| serde_json::Number::from_f64(q).map(Value::Number))
        .unwrap_or_else(|| value.clone())
}

/// `value / divisor`, or `0.0` on any failure.
#[must_use]
pub fn divide(value: &Value, divisor: &Value) -> f64 {
    try_div(value, divisor).unwrap_or(0.0)
}

/// `value * arg`, or `0.0` when either side is not a number.
#[must_use]
pub fn multiply(value: &Value, arg: &Value) -> f64 {
    match (as_f64(value), as_f64(arg)) {
        (Some(v), Some(a)) => v * a,
        _ => 0.0,
    }
}

#[must_use]
pub fn try_percentage(value: &Value, total: &Value) -> Option<f64> {
    let total = as_f64(total).filter(|t| *t > 0.0)?;
    let value = as_f64(value)?;
    Some(((value / total) * 1000.0).round() / 10.0)
}

/// Share of `total`, in percent, rounded to one decimal; `0.0` when
/// `total` is not positive or either side is not a number.
#[must_use]
pub fn percentage(value: &Value, total: &Value) -> f64 {
    try_percentage(value, total).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn div_returns_original_on_failure() {
        assert_eq!(div(&json!(10), &json!(4)), json!(2.5));
        assert_eq!(div(&json!(10), &json!(0)), json!(10));
        assert_eq!(div(&json!("n/a"), &json!(2)), json!("n/a"));
        assert_eq!(div(&json!("7200"), &json!(3600)), json!(2.0));
    }

    #[test]
    fn divide_and_multiply_default_to_zero() {
        assert_eq!(divide(&json!(9), &json!(3)), 3.0);
        assert_eq!(divide(&json!(9), &json!(0)), 0.0);
        assert_eq!(multiply(&json!("2.5"), &json!(4)), 10.0);
        assert_eq!(multiply(&json!(null), &json!(4)), 0.0);
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(&json!(1), &json!(3)), 33.3);
        assert_eq!(percentage(&json!(2), &json!(3)), 66.7);
        assert_eq!(percentage(&json!(5), &json!(0)), 0.0);
        assert_eq!(percentage(&json!(5), &json!(-10)), 0.0);
        assert_eq!(try_percentage(&json!("x"), &json!(10)), None);
    }

    #[test]
    fn as_f64_rejects_non_finite() {
        assert_eq!(as_f64(&json!("inf")), None);
        assert_eq!(as_f64(&json!([1])), None);
        assert_eq!(as_f64(&json!(" 12 ")), Some(12.0));
    }
}
