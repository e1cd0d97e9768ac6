//! Native-kind inspection of candidate values.
//!
//! Inputs are plain `serde_json::Value`s: a tagged union of null, boolean,
//! number (integer or float), string, array and object. These helpers give
//! the validator one place for kind names, scalar text and numeric parsing.
use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

use crate::schema::ValueType;

/// Literals accepted for `boolean` besides native booleans, in message order.
pub const BOOLEAN_LITERALS: [&str; 6] = ["true", "false", "1", "0", "yes", "no"];

/// Decimal literal with optional sign, fraction and exponent. Surrounding
/// whitespace is tolerated.
static NUMERIC_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?\s*$")
        .expect("numeric literal pattern compiles")
});

/// Integral floats below this magnitude print without a fraction.
const INTEGRAL_TEXT_LIMIT: f64 = 1e15;

/// Name of the value's native kind, as used in type-mismatch messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if is_integer(n) => "integer",
        Value::Number(_) => "double",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_integer(n: &Number) -> bool {
    n.is_i64() || n.is_u64()
}

/// Exact native-kind match. `object` and `number` never match here; the
/// first dispatches to child schemas, the second has its own coercion rules.
pub fn has_native_kind(value: &Value, expected: ValueType) -> bool {
    match (expected, value) {
        (ValueType::Boolean, Value::Bool(_)) => true,
        (ValueType::String, Value::String(_)) => true,
        (ValueType::Array, Value::Array(_)) => true,
        (ValueType::Integer, Value::Number(n)) => is_integer(n),
        (ValueType::Double, Value::Number(n)) => !is_integer(n),
        _ => false,
    }
}

/// A canonical `i64` literal: parsing and printing it back yields the same
/// text. Rejects `"042"`, `"42.0"`, `"+42"`, `" 42"` and out-of-range values.
pub fn is_canonical_integer(s: &str) -> bool {
    s.parse::<i64>().is_ok_and(|n| n.to_string() == s)
}

pub fn is_boolean_literal(s: &str) -> bool {
    let lowered = s.to_lowercase();
    BOOLEAN_LITERALS.contains(&lowered.as_str())
}

/// Text of a scalar (string, number, boolean), `None` for null, arrays and
/// objects. Booleans render as `"1"` and `""`; integral floats drop their
/// fraction (`1.0` reads as `"1"`).
pub fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(number_text(n))),
        Value::Bool(true) => Some(Cow::Borrowed("1")),
        Value::Bool(false) => Some(Cow::Borrowed("")),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < INTEGRAL_TEXT_LIMIT => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Numeric reading of numbers and numeric-looking strings. Strings that
/// overflow to infinity have no numeric reading.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if NUMERIC_STRING.is_match(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_names() {
        assert_eq!(kind_name(&json!(null)), "null");
        assert_eq!(kind_name(&json!(true)), "boolean");
        assert_eq!(kind_name(&json!(7)), "integer");
        assert_eq!(kind_name(&json!(u64::MAX)), "integer");
        assert_eq!(kind_name(&json!(7.5)), "double");
        assert_eq!(kind_name(&json!("7")), "string");
        assert_eq!(kind_name(&json!([7])), "array");
        assert_eq!(kind_name(&json!({"a": 7})), "object");
    }

    #[test]
    fn native_kinds() {
        assert!(has_native_kind(&json!(3), ValueType::Integer));
        assert!(!has_native_kind(&json!(3.0), ValueType::Integer));
        assert!(has_native_kind(&json!(3.0), ValueType::Double));
        assert!(!has_native_kind(&json!(3), ValueType::Double));
        assert!(!has_native_kind(&json!({}), ValueType::Array));
        assert!(!has_native_kind(&json!(3), ValueType::Number));
    }

    #[test]
    fn canonical_integers() {
        assert!(is_canonical_integer("42"));
        assert!(is_canonical_integer("-7"));
        assert!(is_canonical_integer("0"));
        for s in ["042", "42.0", "+42", " 42", "-0", "4e2", "", "99999999999999999999"] {
            assert!(!is_canonical_integer(s), "{s:?}");
        }
    }

    #[test]
    fn boolean_literals_ignore_case() {
        assert!(is_boolean_literal("Yes"));
        assert!(is_boolean_literal("FALSE"));
        assert!(is_boolean_literal("0"));
        assert!(!is_boolean_literal("maybe"));
        assert!(!is_boolean_literal("on"));
    }

    #[test]
    fn scalar_texts() {
        assert_eq!(scalar_text(&json!("abc")).as_deref(), Some("abc"));
        assert_eq!(scalar_text(&json!(12)).as_deref(), Some("12"));
        assert_eq!(scalar_text(&json!(true)).as_deref(), Some("1"));
        assert_eq!(scalar_text(&json!(false)).as_deref(), Some(""));
        assert_eq!(scalar_text(&json!(null)), None);
        assert_eq!(scalar_text(&json!(["abc"])), None);
    }

    #[test]
    fn integral_floats_read_as_integers() {
        assert_eq!(scalar_text(&json!(1.0)).as_deref(), Some("1"));
        assert_eq!(scalar_text(&json!(-250.0)).as_deref(), Some("-250"));
        assert_eq!(scalar_text(&json!(1.5)).as_deref(), Some("1.5"));
        assert_eq!(scalar_text(&json!(1e20)).as_deref(), Some(json!(1e20).to_string().as_str()));
    }

    #[test]
    fn numeric_values() {
        assert_eq!(numeric(&json!(12)), Some(12.0));
        assert_eq!(numeric(&json!(-1.5)), Some(-1.5));
        assert_eq!(numeric(&json!("12")), Some(12.0));
        assert_eq!(numeric(&json!(" 1e3 ")), Some(1000.0));
        assert_eq!(numeric(&json!(".5")), Some(0.5));
        assert_eq!(numeric(&json!("12abc")), None);
        assert_eq!(numeric(&json!("inf")), None);
        assert_eq!(numeric(&json!("1e400")), None);
        assert_eq!(numeric(&json!("-1e400")), None);
        assert_eq!(numeric(&json!(true)), None);
        assert_eq!(numeric(&json!([1])), None);
    }
}
