//! Value coercion helpers shared by the property setters
//!
//! Property writes arrive as [`serde_json::Value`]s. These helpers perform the
//! type check for one accepted shape each and convert between the public
//! seconds unit and the microseconds held in backing storage.

use crate::error::{Error, Result};
use serde_json::{Number, Value};

/// Microseconds per second
pub const MICROS_PER_SECOND: u64 = 1_000_000;

/// Short type name of a value, used in type mismatch errors
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "None",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn mismatch(key: &str, expected: &'static str, value: &Value) -> Error {
    Error::TypeMismatch {
        key: key.to_string(),
        expected,
        actual: type_name(value),
    }
}

pub(crate) fn expect_bool(key: &str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| mismatch(key, "bool", value))
}

/// Accept an integer only. Booleans and floats are rejected.
pub(crate) fn expect_int(key: &str, value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) if !n.is_f64() => n.as_i64().ok_or_else(|| Error::TypeMismatch {
            key: key.to_string(),
            expected: "64-bit signed int",
            actual: "int",
        }),
        _ => Err(mismatch(key, "int", value)),
    }
}

pub(crate) fn expect_string(key: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| mismatch(key, "string", value))
}

/// Accept any array; element types are not inspected.
pub(crate) fn expect_list(key: &str, value: &Value) -> Result<Vec<Value>> {
    value
        .as_array()
        .cloned()
        .ok_or_else(|| mismatch(key, "list", value))
}

/// Accept an int or float number of seconds
pub(crate) fn expect_seconds<'a>(key: &str, value: &'a Value) -> Result<&'a Number> {
    match value {
        Value::Number(n) => Ok(n),
        _ => Err(mismatch(key, "int or float", value)),
    }
}

/// Convert a number of seconds to microseconds.
///
/// Floats round to the nearest microsecond. Negative values clamp to zero and
/// values too large for `u64` saturate.
#[must_use]
pub fn seconds_to_micros(seconds: &Number) -> u64 {
    if let Some(whole) = seconds.as_u64() {
        return whole.saturating_mul(MICROS_PER_SECOND);
    }
    if seconds.is_i64() {
        // only negative integers reach here
        return 0;
    }
    let micros = (seconds.as_f64().unwrap_or_default() * MICROS_PER_SECOND as f64).round();
    if micros <= 0.0 { 0 } else { micros as u64 }
}

/// Convert stored microseconds back to seconds
#[must_use]
pub fn micros_to_seconds(micros: u64) -> f64 {
    micros as f64 / MICROS_PER_SECOND as f64
}
