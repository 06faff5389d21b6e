//! Request templater.
//!
//! Rewrites every location-bearing field of a captured request body to one
//! seed. Fields are found structurally: any mapping key whose lowercased
//! name is in the configured [`LocationFields`] and whose value is a string.

use obscan_core::{LocationFields, LocationSeed};
use serde_json::Value;

/// Return a copy of `template` with every location field set to `seed`.
///
/// The input is never touched, so the same template can be reused for every
/// seed of a scan. A template without location fields comes back unchanged.
#[must_use]
pub fn rewrite(template: &Value, seed: &LocationSeed, fields: &LocationFields) -> Value {
    let mut body = template.clone();
    let rewritten = rewrite_in_place(&mut body, seed.as_str(), fields);
    tracing::trace!(seed = %seed, rewritten, "rewrote request template");
    body
}

/// Number of fields [`rewrite`] would replace in `template`.
#[must_use]
pub fn count_location_fields(template: &Value, fields: &LocationFields) -> usize {
    match template {
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| {
                if child.is_string() && fields.contains(key) {
                    1
                } else {
                    count_location_fields(child, fields)
                }
            })
            .sum(),
        Value::Array(items) => items
            .iter()
            .map(|item| count_location_fields(item, fields))
            .sum(),
        _ => 0,
    }
}

fn rewrite_in_place(value: &mut Value, seed: &str, fields: &LocationFields) -> usize {
    match value {
        Value::Object(map) => map
            .iter_mut()
            .map(|(key, child)| match child {
                Value::String(current) if fields.contains(key) => {
                    seed.clone_into(current);
                    1
                }
                _ => rewrite_in_place(child, seed, fields),
            })
            .sum(),
        Value::Array(items) => items
            .iter_mut()
            .map(|item| rewrite_in_place(item, seed, fields))
            .sum(),
        _ => 0,
    }
}
