//! Normalization of loosely typed backend records into canonical records.
//!
//! The backend spells the same attribute several ways depending on which
//! service produced the record. Every canonical field is resolved from an
//! ordered list of [`FieldPath`]s: the first path that yields a usable value
//! wins. Paths are JSON pointers, so nested spellings such as
//! `/user/first_name` sit in the same list as flat ones.
//!
//! Normalizers never fail. Missing data becomes an explicit default.

mod customer;
mod driver;
mod ride;
mod settings;
mod user;
mod vehicle;

pub use customer::*;
pub use driver::*;
pub use ride::*;
pub use settings::*;
pub use user::*;
pub use vehicle::*;

use serde_json::Value;

/// A JSON pointer into a backend record, e.g. `/pickupLocation/address`
pub type FieldPath = &'static str;

/// Wrapper keys under which list payloads arrive, checked in order
const LIST_KEYS: &[FieldPath] = &["/items", "/data", "/users", "/rides", "/data/items"];

/// Resolve the first present, non-null value along `paths`
pub fn resolve<'a>(record: &'a Value, paths: &[FieldPath]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|path| record.pointer(path))
        .find(|value| !value.is_null())
}

/// Resolve the first value along `paths` that renders as non-empty text
pub fn resolve_text(record: &Value, paths: &[FieldPath]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| record.pointer(path))
        .find_map(text)
}

/// Resolve the first present value along `paths` and coerce it to a number
pub fn resolve_number(record: &Value, paths: &[FieldPath]) -> f64 {
    resolve(record, paths).map(to_number).unwrap_or(0.0)
}

/// Resolve the first present value along `paths` as a strict boolean
pub fn resolve_flag(record: &Value, paths: &[FieldPath]) -> Option<bool> {
    resolve(record, paths).map(is_truthy)
}

/// Render a scalar as trimmed, non-empty text. Objects and arrays have no
/// text form.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerce a value to a finite number, falling back to `0`.
///
/// Numbers pass through, strings are trimmed and parsed. Everything else,
/// including booleans and unparsable strings, is `0`.
pub fn to_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Strict truthiness: only `true`, `1`, `"1"` and `"true"` are true
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s == "1" || s == "true",
        _ => false,
    }
}

/// Join optional name parts with a space, `None` when nothing remains
pub fn join_name(first: Option<String>, last: Option<String>) -> Option<String> {
    let joined = [first, last]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let joined = joined.trim();
    (!joined.is_empty()).then(|| joined.to_string())
}

/// Extract the record list from a list payload.
///
/// The payload may be a bare array or an object wrapping the array under one
/// of several keys. Anything else is an empty list.
pub fn items(payload: &Value) -> Vec<Value> {
    if let Value::Array(list) = payload {
        return list.clone();
    }
    LIST_KEYS
        .iter()
        .filter_map(|path| payload.pointer(path))
        .find_map(|value| value.as_array().cloned())
        .unwrap_or_default()
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
