//! Value coercion: numeric detection, text forms and SQL literals.
//!
//! Values arrive untyped from the query builder (a number typed into a text
//! box is still a string), so numeric detection follows the browser's rules:
//! a value is numeric when both `Number(text)` and `parseFloat(text)` accept
//! its text form.

use super::quote::quote_literal;
use super::types::Value;

impl Value {
    /// Text form of the value, as the browser's `String(value)` renders it.
    ///
    /// # Example
    ///
    /// ```
    /// use rowscout_sql::Value;
    ///
    /// assert_eq!(Value::Float(3.5).to_text(), "3.5");
    /// assert_eq!(Value::from(vec![1_i64, 2]).to_text(), "1,2");
    /// assert_eq!(Value::Null.to_text(), "null");
    /// ```
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => format_number(*f),
            Self::String(s) => s.clone(),
            Self::Array(values) => values
                .iter()
                .map(|v| match v {
                    Self::Null => String::new(),
                    other => other.to_text(),
                })
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// The bare SQL number literal for this value, if it is numeric.
    ///
    /// # Example
    ///
    /// ```
    /// use rowscout_sql::Value;
    ///
    /// assert_eq!(Value::from("42").numeric_literal().as_deref(), Some("42"));
    /// assert_eq!(Value::from(" 3.50 ").numeric_literal().as_deref(), Some("3.5"));
    /// assert_eq!(Value::from("forty-two").numeric_literal(), None);
    /// assert_eq!(Value::from("").numeric_literal(), None);
    /// assert_eq!(Value::Bool(true).numeric_literal(), None);
    /// ```
    #[must_use]
    pub fn numeric_literal(&self) -> Option<String> {
        match self {
            Self::Null | Self::Bool(_) => None,
            Self::Int(n) => Some(n.to_string()),
            Self::Float(f) if f.is_finite() => Some(format_number(*f)),
            Self::Float(_) => None,
            Self::String(s) => text_number(s),
            Self::Array(_) => text_number(&self.to_text()),
        }
    }

    /// Whether the value counts as a number.
    pub fn is_numeric(&self) -> bool {
        self.numeric_literal().is_some()
    }
}

/// Render a value for an equality or membership comparison.
///
/// `NULL` for null, a bare number for numeric values, otherwise a quoted
/// literal. Strings are additionally passed through the normalizer when
/// `normalizer` is set.
pub(crate) fn escape_value(value: &Value, normalizer: Option<&str>) -> String {
    if matches!(value, Value::Null) {
        return "NULL".to_string();
    }
    if let Some(number) = value.numeric_literal() {
        return number;
    }
    match (value, normalizer) {
        (Value::String(s), Some(func)) => format!("{func}(lower({}))", quote_literal(s)),
        (Value::String(s), None) => quote_literal(s),
        (other, _) => quote_literal(&other.to_text()),
    }
}

/// Render a value for an ordering comparison: a bare number or a quoted string.
pub(crate) fn ordering_literal(value: &Value) -> String {
    value
        .numeric_literal()
        .unwrap_or_else(|| quote_literal(&value.to_text()))
}

/// Numeric literal for a text value, or `None` if it is not a finite number.
fn text_number(text: &str) -> Option<String> {
    if text.is_empty() || !parse_float_accepts(text) {
        return None;
    }
    js_number(text)
        .filter(|n| n.is_finite())
        .map(format_number)
}

/// `Number(text)`: the whole trimmed string must be a numeric literal.
fn js_number(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return Some(0.0);
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = t.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
        }
    }

    match t {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {},
    }

    // Rust's float parser also takes "inf" and "nan", which Number() rejects
    if !t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    t.parse::<f64>().ok()
}

/// `parseFloat(text)` succeeds when some prefix is a decimal number.
fn parse_float_accepts(text: &str) -> bool {
    let t = text.trim_start();
    let t = t
        .strip_prefix('+')
        .or_else(|| t.strip_prefix('-'))
        .unwrap_or(t);
    if t.starts_with("Infinity") {
        return true;
    }
    let mut chars = t.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Shortest round-trip decimal form, without a trailing `.0`.
fn format_number(n: f64) -> String {
    if n == 0.0 {
        // covers -0
        return "0".to_string();
    }
    format!("{n}")
}
