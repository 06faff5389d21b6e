//! Response normalization.
//!
//! Turns one raw availability response into store records and pickup facts.
//! The response schema is not stable, so every lookup is optional: a missing
//! or oddly-shaped field means "no fact from this node", never an error.
//! The only hard failure is a top level that is not a mapping.

use std::collections::HashSet;

use obscan_core::{AvailabilityFact, FulfillmentType, StoreRecord};
use serde_json::{Map, Value};

use crate::error::MalformedResponseError;
use crate::value::{first_scalar, kind_name, opaque, quantity, walk_objects};

const STORE_ID_KEYS: &[&str] = &["storeId", "locationId", "storeID"];
const STORE_NAME_KEYS: &[&str] = &["name", "storeName"];
const ITEM_SKU_KEYS: &[&str] = &["sku", "skuId"];
const FACT_LOCATION_KEYS: &[&str] = &["locationId", "storeId"];

/// Stores and pickup facts found in one response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub stores: Vec<StoreRecord>,
    pub facts: Vec<AvailabilityFact>,
}

/// Normalize `response` for the single target `product_key`.
///
/// Only pickup hits are kept: a candidate with zero quantity, or any
/// fulfillment type other than `PICKUP`, is dropped here.
///
/// # Errors
///
/// Returns [`MalformedResponseError`] when the top level of `response` is not
/// a JSON object.
pub fn normalize(response: &Value, product_key: &str) -> Result<Normalized, MalformedResponseError> {
    if !response.is_object() {
        return Err(MalformedResponseError {
            found: kind_name(response),
        });
    }

    Ok(Normalized {
        stores: discover_stores(response),
        facts: discover_facts(response, product_key.trim()),
    })
}

/// Collect every mapping that carries both a store id and a store name.
///
/// Walk order is depth-first in document order with parents before
/// children, and the first node seen for a given id wins.
fn discover_stores(response: &Value) -> Vec<StoreRecord> {
    let mut seen = HashSet::new();
    let mut stores = Vec::new();

    walk_objects(response, &mut |node| {
        let Some(store_id) = first_scalar(node, STORE_ID_KEYS) else {
            return;
        };
        let Some(name) = first_scalar(node, STORE_NAME_KEYS) else {
            return;
        };
        if seen.insert(store_id.clone()) {
            stores.push(StoreRecord {
                store_id,
                name,
                metadata: Value::Object(node.clone()),
            });
        }
    });

    stores
}

fn discover_facts(response: &Value, product_key: &str) -> Vec<AvailabilityFact> {
    let Some(items) = response.get("items").and_then(Value::as_array) else {
        tracing::debug!("response has no items sequence");
        return Vec::new();
    };

    let mut facts = Vec::new();
    let mut dropped = 0usize;

    for item in items.iter().filter_map(Value::as_object) {
        if first_scalar(item, ITEM_SKU_KEYS).as_deref() != Some(product_key) {
            continue;
        }
        let Some(condition_code) = first_scalar(item, &["condition"]) else {
            continue;
        };
        let Some(locations) = item.get("locations").and_then(Value::as_array) else {
            continue;
        };

        for location in locations.iter().filter_map(Value::as_object) {
            match candidate_fact(location, product_key, &condition_code) {
                Some(fact) if fact.is_pickup_hit() => facts.push(fact),
                Some(_) => dropped += 1,
                None => {}
            }
        }
    }

    if dropped > 0 {
        tracing::trace!(dropped, "dropped non-pickup or zero-quantity candidates");
    }
    facts
}

/// Build a candidate fact from one `locations[]` entry. Returns `None` when
/// the entry has no location id or an empty `availability` node.
fn candidate_fact(
    location: &Map<String, Value>,
    product_key: &str,
    condition_code: &str,
) -> Option<AvailabilityFact> {
    let store_id = first_scalar(location, FACT_LOCATION_KEYS)?;
    let availability = location
        .get("availability")
        .and_then(Value::as_object)
        .filter(|av| !av.is_empty())?;

    let fulfillment_type = availability
        .get("fulfillmentType")
        .and_then(Value::as_str)
        .map_or_else(|| FulfillmentType::Other(String::new()), FulfillmentType::parse);

    Some(AvailabilityFact {
        product_key: product_key.to_string(),
        condition_code: condition_code.to_string(),
        store_id,
        quantity: availability
            .get("availablePickupQuantity")
            .map_or(0, quantity),
        fulfillment_type,
        window_start: opaque(availability, "minDate"),
        window_end: opaque(availability, "maxDate"),
        min_pickup_minutes: opaque(availability, "minPickupMinutes"),
        max_pickup_time: opaque(availability, "maxPickupTime"),
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
