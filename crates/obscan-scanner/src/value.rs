//! Helpers for walking untyped JSON.

use serde_json::{Map, Value};

/// Depth-first, pre-order walk over every object node in document order.
///
/// An object is visited before any of its values. Values follow the order
/// their keys appear in the source (`serde_json` is built with
/// `preserve_order`); array elements are visited in index order.
pub(crate) fn walk_objects<'a, F>(value: &'a Value, visit: &mut F)
where
    F: FnMut(&'a Map<String, Value>),
{
    match value {
        Value::Object(map) => {
            visit(map);
            for child in map.values() {
                walk_objects(child, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_objects(item, visit);
            }
        }
        _ => {}
    }
}

/// Stringify an identity-like scalar. Blank strings, `null`, booleans and
/// containers yield `None`.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First key of `keys` holding a usable scalar.
pub(crate) fn first_scalar(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find_map(scalar_to_string)
}

/// Read a quantity. Whole numbers and whole numeric strings are accepted;
/// fractions, negatives and anything else count as zero.
pub(crate) fn quantity(value: &Value) -> u32 {
    let whole = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_number)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_number))
        }
        _ => None,
    };
    whole.map_or(0, |q| u32::try_from(q).unwrap_or(u32::MAX))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_number(q: f64) -> Option<u64> {
    (q.is_finite() && q > 0.0 && q.fract() == 0.0).then(|| q as u64)
}

/// Pass a field through verbatim; `null` counts as absent.
pub(crate) fn opaque(map: &Map<String, Value>, key: &str) -> Option<Value> {
    map.get(key).filter(|v| !v.is_null()).cloned()
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
