use serde_json::json;

use super::*;

// -----------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------

fn location(id: &str, qty: serde_json::Value, fulfillment: &str) -> serde_json::Value {
    json!({
        "locationId": id,
        "availability": {
            "availablePickupQuantity": qty,
            "fulfillmentType": fulfillment,
            "minDate": "2026-10-20",
            "maxDate": "2026-10-21",
            "minPickupMinutes": 60,
            "maxPickupTime": null
        }
    })
}

fn response_with(locations: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "items": [{
            "sku": "6602747",
            "condition": "FAIR",
            "locations": locations
        }],
        "locations": [
            {"locationId": "123", "name": "Atlanta Midtown", "address": "1201 Peachtree St", "phone": "404-555-0100"}
        ]
    })
}

// -----------------------------------------------------------------------
// Fact discovery
// -----------------------------------------------------------------------

#[test]
fn extracts_pickup_hit_with_opaque_metadata() {
    let response = response_with(vec![location("123", json!(2), "PICKUP")]);
    let normalized = normalize(&response, "6602747").unwrap();

    assert_eq!(normalized.facts.len(), 1);
    let fact = &normalized.facts[0];
    assert_eq!(fact.product_key, "6602747");
    assert_eq!(fact.condition_code, "FAIR");
    assert_eq!(fact.store_id, "123");
    assert_eq!(fact.quantity, 2);
    assert_eq!(fact.fulfillment_type, FulfillmentType::Pickup);
    assert_eq!(fact.window_start, Some(json!("2026-10-20")));
    assert_eq!(fact.window_end, Some(json!("2026-10-21")));
    assert_eq!(fact.min_pickup_minutes, Some(json!(60)));
    assert_eq!(fact.max_pickup_time, None, "null passes through as absent");
}

#[test]
fn drops_zero_and_missing_quantity() {
    let mut missing = location("125", json!(0), "PICKUP");
    missing["availability"]
        .as_object_mut()
        .unwrap()
        .remove("availablePickupQuantity");
    let response = response_with(vec![
        location("123", json!(0), "PICKUP"),
        location("124", json!(null), "PICKUP"),
        missing,
        location("126", json!(-1), "PICKUP"),
    ]);
    let normalized = normalize(&response, "6602747").unwrap();
    assert!(normalized.facts.is_empty(), "got: {:?}", normalized.facts);
}

#[test]
fn drops_non_pickup_fulfillment() {
    let response = response_with(vec![
        location("123", json!(4), "SHIPPING"),
        location("124", json!(4), "pickup"),
        json!({"locationId": "125", "availability": {"availablePickupQuantity": 4}}),
    ]);
    let normalized = normalize(&response, "6602747").unwrap();
    assert!(normalized.facts.is_empty(), "got: {:?}", normalized.facts);
}

#[test]
fn skips_items_for_other_products() {
    let response = json!({
        "items": [
            {"sku": "6602752", "condition": "FAIR", "locations": [location("1", json!(5), "PICKUP")]},
            {"sku": 6_602_747, "condition": "GOOD", "locations": [location("2", json!(1), "PICKUP")]}
        ]
    });
    let normalized = normalize(&response, "6602747").unwrap();
    assert_eq!(normalized.facts.len(), 1);
    assert_eq!(normalized.facts[0].store_id, "2", "numeric sku compares as string");
    assert_eq!(normalized.facts[0].condition_code, "GOOD");
}

#[test]
fn sku_id_is_accepted_as_product_identity() {
    let response = json!({
        "items": [{"skuId": "6602747", "condition": "2", "locations": [location("9", json!(1), "PICKUP")]}]
    });
    let normalized = normalize(&response, " 6602747 ").unwrap();
    assert_eq!(normalized.facts.len(), 1);
    assert_eq!(normalized.facts[0].condition_code, "2");
}

#[test]
fn tolerates_missing_and_malformed_branches() {
    let response = json!({
        "items": [
            "not-an-item",
            {"sku": "6602747"},
            {"sku": "6602747", "condition": "FAIR", "locations": "nope"},
            {"sku": "6602747", "condition": "FAIR", "locations": [
                7,
                {"availability": {"availablePickupQuantity": 1, "fulfillmentType": "PICKUP"}},
                {"locationId": "1", "availability": {}},
                {"locationId": "2", "availability": null},
                {"locationId": "3"},
                location("4", json!(1), "PICKUP")
            ]}
        ]
    });
    let normalized = normalize(&response, "6602747").unwrap();
    assert_eq!(normalized.facts.len(), 1);
    assert_eq!(normalized.facts[0].store_id, "4");
}

#[test]
fn store_id_is_accepted_on_location_entries() {
    let response = json!({
        "items": [{"sku": "6602747", "condition": "FAIR", "locations": [
            {"storeId": "123", "availability": {"availablePickupQuantity": 2, "fulfillmentType": "PICKUP"}}
        ]}]
    });
    let normalized = normalize(&response, "6602747").unwrap();
    assert_eq!(normalized.facts.len(), 1);
    assert_eq!(normalized.facts[0].store_id, "123");
}

#[test]
fn items_not_a_sequence_yields_no_facts_but_keeps_stores() {
    let response = json!({
        "items": {"sku": "6602747"},
        "stores": [{"storeId": 281, "storeName": "Richfield"}]
    });
    let normalized = normalize(&response, "6602747").unwrap();
    assert!(normalized.facts.is_empty());
    assert_eq!(normalized.stores.len(), 1);
    assert_eq!(normalized.stores[0].store_id, "281");
}

#[test]
fn top_level_sequence_is_malformed() {
    let err = normalize(&json!([{"items": []}]), "6602747").unwrap_err();
    assert_eq!(err.found, "array");
    let err = normalize(&json!(null), "6602747").unwrap_err();
    assert_eq!(err.found, "null");
}

#[test]
fn empty_object_is_valid_and_empty() {
    let normalized = normalize(&json!({}), "6602747").unwrap();
    assert_eq!(normalized, Normalized::default());
}

#[test]
fn normalizing_twice_is_identical() {
    let response = response_with(vec![
        location("123", json!(2), "PICKUP"),
        location("124", json!(1), "PICKUP"),
    ]);
    let first = normalize(&response, "6602747").unwrap();
    let second = normalize(&response, "6602747").unwrap();
    assert_eq!(first, second);
}

// -----------------------------------------------------------------------
// Store discovery
// -----------------------------------------------------------------------

#[test]
fn discovers_stores_by_id_and_name_synonyms() {
    let response = json!({
        "a": {"storeId": "1", "name": "One"},
        "b": [{"storeID": 2, "storeName": "Two"}],
        "c": {"locationId": "3", "storeName": "Three", "phone": "555"},
        "d": {"storeId": "4"},
        "e": {"name": "nameless"}
    });
    let normalized = normalize(&response, "x").unwrap();
    let ids: Vec<&str> = normalized
        .stores
        .iter()
        .map(|s| s.store_id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(normalized.stores[2].name, "Three");
    assert_eq!(normalized.stores[2].metadata["phone"], "555");
}

#[test]
fn first_store_occurrence_wins() {
    let response = json!({
        "a": {"storeId": "7", "name": "First", "depth": {"storeId": "7", "name": "Nested"}},
        "b": {"storeId": "7", "name": "Later"}
    });
    let normalized = normalize(&response, "x").unwrap();
    assert_eq!(normalized.stores.len(), 1);
    assert_eq!(normalized.stores[0].name, "First");
}

#[test]
fn first_store_in_document_order_wins_over_key_order() {
    let response: serde_json::Value = serde_json::from_str(
        r#"{
            "stores": [{"storeId": "123", "name": "Listed first"}],
            "items": [{"storeId": "123", "name": "Listed second"}]
        }"#,
    )
    .unwrap();
    let normalized = normalize(&response, "6602747").unwrap();
    assert_eq!(normalized.stores.len(), 1);
    assert_eq!(normalized.stores[0].name, "Listed first");
}

#[test]
fn fractional_pickup_quantity_is_dropped() {
    let response = response_with(vec![location("123", json!(0.5), "PICKUP")]);
    let normalized = normalize(&response, "6602747").unwrap();
    assert!(normalized.facts.is_empty(), "got: {:?}", normalized.facts);
}

#[test]
fn store_metadata_is_the_whole_node() {
    let response = response_with(vec![]);
    let normalized = normalize(&response, "6602747").unwrap();
    assert_eq!(normalized.stores.len(), 1);
    let store = &normalized.stores[0];
    assert_eq!(store.store_id, "123");
    assert_eq!(store.metadata["address"], "1201 Peachtree St");
}
