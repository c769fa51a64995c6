//! Numeric cell formatting.
//!
//! Quantity and value columns use the South-Asian grouping convention:
//! the first three digits from the decimal point form one group, every
//! two digits after that form another (1234567.8 -> "12,34,567.80").
//! Percentage columns are plain fixed-point, no grouping.

use serde_json::Value;

/// Best-effort numeric reading of a raw JSON cell. Null counts as zero,
/// quoted numbers are parsed, anything else is rejected.
fn lenient_f64(raw: &Value) -> Option<f64> {
    match raw {
        Value::Null => Some(0.0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Group an unsigned integer digit string: last three digits, then pairs.
fn group_digits(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Format a quantity/value cell with exactly `decimals` fraction digits
/// and grouped integer digits. Unparseable or non-finite input renders
/// as the literal "0".
pub fn format_grouped(raw: &Value, decimals: usize) -> String {
    let n = match lenient_f64(raw) {
        Some(n) if n.is_finite() => n,
        _ => return "0".to_string(),
    };

    let fixed = format!("{:.*}", decimals, n);
    let (unsigned, negative) = match fixed.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (fixed.as_str(), false),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a percentage cell: the stored fraction times 100, fixed to two
/// decimals, with a trailing "%". No grouping on this path.
pub fn format_pct(raw: &Value) -> String {
    let n = match lenient_f64(raw) {
        Some(n) if n.is_finite() => n,
        _ => 0.0,
    };
    format!("{:.2}%", n * 100.0)
}
