//! # Value Model
//!
//! The tree every engine operates on is `serde_json::Value`, built with the
//! `arbitrary_precision` and `preserve_order` features. Numbers keep the text
//! they were written with, so `1.10` still has a decimal scale of two after a
//! parse/print cycle, and objects keep insertion order.
//!
//! Numeric work goes through [`bigdecimal::BigDecimal`], never `f64`, so
//! neither digit count nor scale has an upper bound.
//!
//! The reserved tag names live in [`keys`]. The `lenient_*` readers accept
//! the same loose encodings older producers emit (`"true"` for `true`, `"3"`
//! for `3`).

use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive, Zero};

pub use serde_json::{Map, Number, Value};

/// An ordered JSON object.
pub type Object = Map<String, Value>;

/// Reserved tag and field names.
pub mod keys {
    /// Document identifier.
    pub const ID: &str = "id";
    /// Document lifecycle state.
    pub const STATE: &str = "state";
    /// Activation flag (typed leaf).
    pub const ACTIVE: &str = "active";
    /// Visibility flag (typed leaf).
    pub const VISIBLE: &str = "visible";

    /// Declared data type of a typed leaf.
    pub const TYPE: &str = "type";
    /// Payload of a typed leaf.
    pub const VALUE: &str = "value";
    /// Rejects empty strings when true.
    pub const MANDATORY: &str = "mandatory";
    /// Inclusive lower bound (value or length).
    pub const MIN: &str = "min";
    /// Inclusive upper bound (value or length).
    pub const MAX: &str = "max";

    /// Uniqueness directive.
    pub const UNIQUE: &str = "unique";
    /// Composite key fields of a uniqueness directive.
    pub const SCOPE: &str = "scope";
    /// Name of one scope field.
    pub const FIELD: &str = "field";
    /// Scope combination mode.
    pub const MODE: &str = "mode";

    /// Sentinel key marking a value with nothing to compare.
    pub const EMPTY: &str = "empty";
}

/// `state` value of a logically deleted document.
pub const STATE_DELETED: i64 = -1;

/// `state` value of a live document.
pub const STATE_NORMAL: i64 = 0;

/// Parse decimal text (plain or scientific) without losing scale.
pub fn parse_decimal(text: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(text.trim()).ok()
}

/// The decimal behind a JSON number, or `None` for anything else.
pub fn decimal_of(value: &Value) -> Option<BigDecimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        _ => None,
    }
}

/// Number of fraction digits of a decimal. Exponent forms such as `1.5E2`
/// have none.
pub fn decimal_scale(decimal: &BigDecimal) -> u32 {
    let (_, scale) = decimal.as_bigint_and_exponent();
    u32::try_from(scale.max(0)).unwrap_or(u32::MAX)
}

/// Decimal scale of a JSON number as written.
pub fn scale_of(value: &Value) -> Option<u32> {
    decimal_of(value).map(|d| decimal_scale(&d))
}

/// Read a boolean tag: a JSON boolean or the text `true`/`false`.
pub fn lenient_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Read an integer tag: a JSON number or numeric text, truncated toward zero.
pub fn lenient_i64(value: &Value) -> Option<i64> {
    let decimal = match value {
        Value::Number(_) => decimal_of(value)?,
        Value::String(s) => parse_decimal(s)?,
        _ => return None,
    };
    // Past 10^19 the integer part cannot fit; skip the rescale.
    let (digits, scale) = decimal.as_bigint_and_exponent();
    if !digits.is_zero() && scale < -19 {
        return None;
    }
    decimal.with_scale(0).to_i64()
}

/// Name of a value's JSON kind, for error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Equality with numbers compared by magnitude, so `888` equals `888.0`.
///
/// Objects compare as maps (order-insensitive), arrays element-wise.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => match (decimal_of(a), decimal_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, l)| y.get(k).is_some_and(|r| values_equal(l, r)))
        }
        _ => a == b,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The scale read back is the number of fraction digits written.
        #[test]
        fn scale_matches_written_digits(int in 0u32..1_000_000, frac in "[0-9]{0,12}") {
            let text = if frac.is_empty() { int.to_string() } else { format!("{int}.{frac}") };
            let value: Value = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(scale_of(&value), Some(frac.len() as u32));
        }

        /// Trailing zeros change the scale but never the magnitude.
        #[test]
        fn trailing_zeros_compare_equal(int in any::<i32>(), zeros in 1usize..6) {
            let plain: Value = serde_json::from_str(&int.to_string()).unwrap();
            let padded: Value =
                serde_json::from_str(&format!("{int}.{}", "0".repeat(zeros))).unwrap();
            prop_assert!(values_equal(&plain, &padded));
            prop_assert_eq!(scale_of(&padded), Some(zeros as u32));
        }
    }
}
