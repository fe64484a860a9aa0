//! Tolerant, type-aware cell equality

use gridmark_core::CellValue;

/// Relative tolerance used when an exercise does not configure one
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Compare a learner's cell against the solution's cell
///
/// - Absent cells only equal absent cells.
/// - If both sides read as numbers, they are equal when
///   `|student - solution| <= tolerance * |solution|`. A student value of
///   exactly `solution * (1 ± tolerance)` also counts, since the subtraction
///   can round it just past the bound.
/// - Otherwise both are compared as trimmed, case-insensitive text.
///
/// ```
/// use gridmark_core::CellValue;
/// use gridmark_engine::values_equal;
///
/// assert!(values_equal(&"100.5".into(), &"100".into(), 0.01));
/// assert!(values_equal(&"Paris ".into(), &"paris".into(), 0.01));
/// assert!(!values_equal(&CellValue::Empty, &"".into(), 0.01));
/// ```
pub fn values_equal(student: &CellValue, solution: &CellValue, tolerance: f64) -> bool {
    match (student.is_empty(), solution.is_empty()) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        (false, false) => {}
    }

    if let (Some(actual), Some(expected)) = (numeric_value(student), numeric_value(solution)) {
        return (actual - expected).abs() <= expected.abs() * tolerance
            || actual == expected * (1.0 + tolerance)
            || actual == expected * (1.0 - tolerance);
    }

    normalized_text(student) == normalized_text(solution)
}

fn numeric_value(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::String(s) => parse_number(s.as_str()),
        CellValue::Empty | CellValue::Boolean(_) => None,
    }
}

fn normalized_text(value: &CellValue) -> String {
    value.display_text().trim().to_lowercase()
}

/// Leniently read a number from the start of `text`
///
/// Leading whitespace is skipped and the longest prefix that forms a decimal
/// number (optional sign, digits, fraction, exponent) or `Infinity` is used,
/// so `"3.0"`, `" 42 "`, `"12%"` and `"1e3 units"` all parse. Returns `None`
/// when no digits lead the text.
///
/// ```
/// use gridmark_engine::parse_number;
///
/// assert_eq!(parse_number("3.0"), Some(3.0));
/// assert_eq!(parse_number("-.5kg"), Some(-0.5));
/// assert_eq!(parse_number("$12"), None);
/// ```
pub fn parse_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    if s[pos..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = pos;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        frac_digits = &s[frac_start..end];
        pos = end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent = "";
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let exp_start = pos + 1;
        let mut end = exp_start;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let digits_start = end;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        if end > digits_start {
            exponent = &s[exp_start..end];
        }
    }

    let mut literal = String::with_capacity(int_digits.len() + frac_digits.len() + 8);
    if negative {
        literal.push('-');
    }
    literal.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        literal.push('.');
        literal.push_str(frac_digits);
    }
    if !exponent.is_empty() {
        literal.push('e');
        literal.push_str(exponent);
    }

    literal.parse().ok()
}
