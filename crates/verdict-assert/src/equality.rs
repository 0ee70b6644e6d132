//! Structural equality and canonical encoding of judged values.
//!
//! Values are compared after conversion to `serde_json::Value`. Equality is
//! recursive: object members compare as an unordered set of keys, arrays are
//! ordered, and numbers compare by exact numeric value, so `1` equals `1.0`
//! but `9007199254740993` does not equal `9007199254740992.0`.
//! A `null` member is significant: `{"a": null}` does not equal `{}`.
//! Cycles cannot occur in a `Value`. `NaN` and the infinities have no `Value`
//! form, so a judged value containing one is refused with
//! [`VerdictError::Serialization`](verdict_core::VerdictError::Serialization) instead of being compared as `null`; the
//! same error covers members that cannot be serialized at all.

use serde::Serialize;
use serde_json::{Number, Value};
use verdict_core::Result;

use crate::capture::Captured;

/// Converts any serializable value into a `Value`.
///
/// # Errors
/// Returns [`VerdictError::Serialization`](verdict_core::VerdictError::Serialization)
/// if the value cannot be serialized or contains a non-finite float.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Captured::of(value)?.into_finite()
}

/// Deep equality over `Value`s.
#[must_use]
pub fn structurally_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| structurally_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| structurally_equal(x, y)))
        }
        _ => left == right,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (integer(a), integer(b)) {
        (Some(x), Some(y)) => x == y,
        (Some(i), None) => b.as_f64().is_some_and(|f| float_equals_integer(f, i)),
        (None, Some(i)) => a.as_f64().is_some_and(|f| float_equals_integer(f, i)),
        (None, None) => a.as_f64() == b.as_f64(),
    }
}

fn integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

// Every integral f64 below 2^127 converts to i128 without rounding.
fn float_equals_integer(f: f64, i: i128) -> bool {
    f.fract() == 0.0 && f.abs() < 1.0e38 && f as i128 == i
}

/// Deterministic textual form with object keys sorted, used in messages.
#[must_use]
pub fn canonical_encoding(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::from(key.as_str()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
