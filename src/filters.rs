//! Money and percentage formatting for page templates and notifications.
//!
//! Format: minus sign for negatives, currency symbol + number with thousands separator and two
//! decimal places, e.g. `₹12,345.60`.

/// Format an amount without a sign prefix.
pub fn format_amount(value: f64, symbol: &str) -> String {
    let sign = if value < 0.0 && round_cents(value) != 0 {
        "-"
    } else {
        ""
    };
    format!("{}{}{}", sign, symbol, format_unsigned(value))
}

/// One decimal place, no sign prefix for positive values.
pub fn format_percent(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", rounded)
}

/// Like [`format_percent`] but with a `+` for positive values.
pub fn format_signed_percent(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded > 0.0 {
        format!("+{:.1}%", rounded)
    } else {
        format_percent(rounded)
    }
}

fn round_cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

fn format_unsigned(value: f64) -> String {
    let cents = round_cents(value).abs();
    format!(
        "{}.{:02}",
        format_with_thousands(cents / 100, ','),
        cents % 100
    )
}

/// Format a number with thousands separators.
fn format_with_thousands(n: i64, sep: char) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(sep);
        }
        result.push(c);
    }
    result
}
