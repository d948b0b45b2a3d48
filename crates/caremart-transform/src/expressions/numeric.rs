//! Safe numeric casts and null-safe arithmetic.

/// Parse a decimal number, returning `None` for blank, malformed or
/// non-finite input.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a whole number. Decimal text with no fractional part (`"45.0"`) is
/// accepted; anything else with a fraction is not.
pub fn parse_integer(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    let v = parse_number(trimmed)?;
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// Divide, yielding `None` when the denominator is zero.
pub fn safe_divide(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// `part / whole * 100`, rounded to two decimals; `None` when `whole` is zero.
///
/// # Examples
/// ```
/// use caremart_transform::expressions::percentage;
///
/// assert_eq!(percentage(1.0, 3.0), Some(33.33));
/// assert_eq!(percentage(5.0, 0.0), None);
/// ```
pub fn percentage(part: f64, whole: f64) -> Option<f64> {
    safe_divide(part, whole).map(|ratio| round_to(ratio * 100.0, 2))
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Format an amount as US currency with thousands separators.
///
/// # Examples
/// ```
/// use caremart_transform::expressions::format_currency;
///
/// assert_eq!(format_currency(1234.5), "$1,234.50");
/// assert_eq!(format_currency(-75.0), "-$75.00");
/// ```
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", round_to(amount, 2).abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && round_to(amount, 2) != 0.0 {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

/// Whether a numeric result lies outside its reference range.
///
/// Both bounds are inclusive-normal. `None` when the value or either bound is
/// missing.
pub fn is_abnormal(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> Option<bool> {
    match (value, min, max) {
        (Some(v), Some(lo), Some(hi)) => Some(v < lo || v > hi),
        _ => None,
    }
}
