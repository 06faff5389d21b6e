//! Report emission: a durable JSON form plus a short human summary.

use serde::Serialize;
use serde_json::Value;

use crate::aggregate::{Aggregate, AggregateRecord};

/// Maximum number of records listed in the human summary.
pub const SUMMARY_LIMIT: usize = 50;
/// Maximum characters of the per-record description in the summary.
pub const DESCRIPTION_WIDTH: usize = 160;

/// One persisted hit. Field names match the durable output format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HitRecord<'a> {
    pub sku: &'a str,
    pub condition_code: &'a str,
    pub store_id: &'a str,
    pub quantity: u32,
    pub min_date: Option<&'a Value>,
    pub max_date: Option<&'a Value>,
    pub min_pickup_minutes: Option<&'a Value>,
    pub max_pickup_time: Option<&'a Value>,
    pub store: Option<&'a Value>,
    pub seed: &'a str,
}

impl<'a> From<&'a AggregateRecord> for HitRecord<'a> {
    fn from(record: &'a AggregateRecord) -> Self {
        let fact = &record.fact;
        Self {
            sku: &fact.product_key,
            condition_code: &fact.condition_code,
            store_id: &fact.store_id,
            quantity: fact.quantity,
            min_date: fact.window_start.as_ref(),
            max_date: fact.window_end.as_ref(),
            min_pickup_minutes: fact.min_pickup_minutes.as_ref(),
            max_pickup_time: fact.max_pickup_time.as_ref(),
            store: record.store.as_ref().map(|s| &s.metadata),
            seed: record.seed.as_str(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    /// Pretty JSON array of hits, ordered by aggregate key.
    pub durable: String,
    pub summary: String,
    pub hits: usize,
}

/// Serialize `aggregate` and build its summary.
///
/// An empty aggregate is a valid outcome and produces `[]`.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn emit(aggregate: &Aggregate) -> Result<Report, serde_json::Error> {
    let records: Vec<HitRecord<'_>> = aggregate.iter().map(|(_, r)| r.into()).collect();
    let durable = serde_json::to_string_pretty(&records)?;
    Ok(Report {
        durable,
        summary: summarize(aggregate, SUMMARY_LIMIT),
        hits: aggregate.len(),
    })
}

/// Human-readable listing of at most `limit` records.
#[must_use]
pub fn summarize(aggregate: &Aggregate, limit: usize) -> String {
    if aggregate.is_empty() {
        return "no pickup hits found".to_string();
    }

    let mut lines = vec![format!("{} pickup hit(s):", aggregate.len())];
    for (_, record) in aggregate.iter().take(limit) {
        lines.push(format!(
            "- {} | store {} | seed {} | {}",
            record.fact.product_key,
            record.fact.store_id,
            record.seed,
            truncate_chars(&describe(record), DESCRIPTION_WIDTH),
        ));
    }
    if aggregate.len() > limit {
        lines.push(format!("... and {} more", aggregate.len() - limit));
    }
    lines.join("\n")
}

fn describe(record: &AggregateRecord) -> String {
    let fact = &record.fact;
    let mut text = format!("{} x{}", fact.condition_code, fact.quantity);

    if let Some(store) = &record.store {
        text.push_str(" at ");
        text.push_str(&store.name);
        if let Some(address) = store.metadata.get("address").and_then(Value::as_str) {
            text.push_str(", ");
            text.push_str(address);
        }
    }

    match (&fact.window_start, &fact.window_end) {
        (Some(start), Some(end)) => {
            text.push_str(&format!(" | pickup {} to {}", plain(start), plain(end)));
        }
        (Some(start), None) => text.push_str(&format!(" | pickup from {}", plain(start))),
        _ => {}
    }
    text
}

/// Render a scalar without JSON string quotes.
fn plain(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_string)
}

fn truncate_chars(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
