// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lenient accessors over untyped device JSON.
//!
//! Firmware versions disagree on whether numbers are sent as JSON numbers or
//! as strings, and on whether booleans are `true` or `"True"`. These helpers
//! accept every representation seen in the field and return `None` for
//! anything else instead of failing.

use serde_json::Value;

/// A function extracting a typed value from a payload.
pub(crate) type Extractor<T> = fn(&Value) -> Option<T>;

/// Tries each extractor in order and returns the first match.
pub(crate) fn first_match<T>(value: &Value, strategies: &[Extractor<T>]) -> Option<T> {
    strategies.iter().find_map(|extract| extract(value))
}

/// Returns the object field `key`, if `value` is an object holding it.
pub(crate) fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object()?.get(key)
}

/// Returns the nested object field `outer.inner`.
pub(crate) fn nested<'a>(value: &'a Value, outer: &str, inner: &str) -> Option<&'a Value> {
    field(field(value, outer)?, inner)
}

/// Reads a number or a numeric string as `f64`.
pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Reads an integral number or an integer string as `i64`.
///
/// Fractional JSON numbers are truncated toward zero; fractional strings
/// are rejected.
pub(crate) fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|v| v.is_finite() && v.abs() < 9.0e18)
                // Safe: finite and within i64 range
                .map(|v| {
                    #[allow(clippy::cast_possible_truncation)]
                    let truncated = v.trunc() as i64;
                    truncated
                })
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Reads a non-empty string.
pub(crate) fn as_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Reads the device's `"True"` / `"False"` flags, or a JSON boolean.
pub(crate) fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s == "True" => Some(true),
        Value::String(s) if s == "False" => Some(false),
        _ => None,
    }
}
