//! Domain types shared by the scanner and the CLI.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Location-bearing request keys rewritten by default (compared lowercased).
pub const DEFAULT_LOCATION_FIELDS: &[&str] =
    &["postalcode", "zipcode", "searchzipcode", "destinationzip"];

/// An opaque geographic token (postal code or equivalent) used to query
/// availability from a different vantage point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationSeed(String);

impl LocationSeed {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationSeed {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

/// The set of request keys the templater treats as location fields.
///
/// Names are stored lowercased; lookups lowercase the requested key so
/// `postalCode`, `PostalCode` and `postalcode` all match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFields(BTreeSet<String>);

impl LocationFields {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            names
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(&key.to_lowercase())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for LocationFields {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION_FIELDS)
    }
}

/// A response node identified as describing a physical store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub store_id: String,
    pub name: String,
    /// The whole store node (address, phone, hours), passed through unexamined.
    pub metadata: serde_json::Value,
}

/// How an item reaches the customer at a given location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FulfillmentType {
    Pickup,
    Other(String),
}

impl FulfillmentType {
    /// Exact, case-sensitive match on the service's `PICKUP` marker.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == "PICKUP" {
            Self::Pickup
        } else {
            Self::Other(raw.to_owned())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pickup => "PICKUP",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for FulfillmentType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<FulfillmentType> for String {
    fn from(kind: FulfillmentType) -> Self {
        kind.as_str().to_owned()
    }
}

impl fmt::Display for FulfillmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized observation of pickup availability for one
/// product/store/condition combination.
///
/// The window and ETA fields are opaque: whatever the service sent is kept
/// verbatim, `None` when absent or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityFact {
    pub product_key: String,
    pub condition_code: String,
    pub store_id: String,
    pub quantity: u32,
    pub fulfillment_type: FulfillmentType,
    /// `minDate` of the pickup window.
    pub window_start: Option<serde_json::Value>,
    /// `maxDate` of the pickup window.
    pub window_end: Option<serde_json::Value>,
    pub min_pickup_minutes: Option<serde_json::Value>,
    pub max_pickup_time: Option<serde_json::Value>,
}

impl AvailabilityFact {
    #[must_use]
    pub fn key(&self) -> AggregateKey {
        AggregateKey {
            product_key: self.product_key.clone(),
            store_id: self.store_id.clone(),
            condition_code: self.condition_code.clone(),
        }
    }

    /// A pickup hit: positive quantity offered for in-store pickup.
    #[must_use]
    pub fn is_pickup_hit(&self) -> bool {
        self.quantity > 0 && self.fulfillment_type == FulfillmentType::Pickup
    }
}

/// Identity under which facts are deduplicated. Ordering is
/// product, then store, then condition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AggregateKey {
    pub product_key: String,
    pub store_id: String,
    pub condition_code: String,
}

impl fmt::Display for AggregateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}/{}",
            self.product_key, self.store_id, self.condition_code
        )
    }
}

/// Which record survives when two facts for the same key are equally
/// available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The record from the lexicographically smallest seed token wins.
    /// Independent of merge order.
    #[default]
    LowestSeed,
    /// The record already in the aggregate is kept.
    FirstSeen,
}
