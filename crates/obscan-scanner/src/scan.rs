//! Seed scanner.
//!
//! Drives one scan run: for every seed, rewrite the template, submit it
//! through the [`Transport`], normalize the response and keep the result.
//! A failing seed is recorded and never aborts the run.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use obscan_core::{
    AvailabilityFact, ConfigError, LocationFields, LocationSeed, ScanConfig, StoreRecord, TieBreak,
};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::{Interval, MissedTickBehavior};

use crate::aggregate::Aggregate;
use crate::error::{SeedError, TransportError};
use crate::normalize::normalize;
use crate::template::{count_location_fields, rewrite};
use crate::transport::Transport;

/// Run-level knobs for [`Scanner`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Seeds in flight at once. Always at least 1.
    pub concurrency: usize,
    /// Bound on one seed's whole submit, transport retries included.
    pub per_seed_timeout: Duration,
    /// Minimum spacing between consecutive submits across all in-flight
    /// seeds. The first submit of the run is not delayed.
    pub inter_request_delay: Duration,
    pub location_fields: LocationFields,
    /// Keep only facts with this condition code (case-insensitive).
    pub condition: Option<String>,
    /// Tie policy used by [`ScanOutcome::aggregate`].
    pub tie_break: TieBreak,
}

impl ScanOptions {
    /// Options taken from a scan file, sequential and without delay.
    #[must_use]
    pub fn from_scan_config(config: &ScanConfig) -> Self {
        Self {
            concurrency: 1,
            per_seed_timeout: config.per_seed_timeout,
            inter_request_delay: Duration::ZERO,
            location_fields: config.location_fields.clone(),
            condition: config.condition.clone(),
            tie_break: config.tie_break,
        }
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn with_inter_request_delay(mut self, delay: Duration) -> Self {
        self.inter_request_delay = delay;
        self
    }
}

/// Normalized output of one successful seed.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedResult {
    pub seed: LocationSeed,
    pub facts: Vec<AvailabilityFact>,
    pub stores: Vec<StoreRecord>,
}

#[derive(Debug)]
pub struct SeedFailure {
    pub seed: LocationSeed,
    pub error: SeedError,
}

/// Everything a run produced. `results` and `failures` are each in seed
/// configuration order.
#[derive(Debug)]
pub struct ScanOutcome {
    pub results: Vec<SeedResult>,
    pub failures: Vec<SeedFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub tie_break: TieBreak,
}

impl ScanOutcome {
    /// Merge every seed's facts, one seed at a time, in configuration order,
    /// under the run's tie policy.
    #[must_use]
    pub fn aggregate(&self) -> Aggregate {
        let mut aggregate = Aggregate::new(self.tie_break);
        for result in &self.results {
            aggregate.merge(&result.seed, &result.facts, &result.stores);
        }
        aggregate
    }

    #[must_use]
    pub fn fact_count(&self) -> usize {
        self.results.iter().map(|r| r.facts.len()).sum()
    }
}

pub struct Scanner<T> {
    transport: T,
    options: ScanOptions,
}

impl<T: Transport> Scanner<T> {
    pub fn new(transport: T, options: ScanOptions) -> Self {
        Self { transport, options }
    }

    /// Scan every seed for `product_key`.
    ///
    /// Per-seed failures land in [`ScanOutcome::failures`]; the scan itself
    /// only fails on unusable input, before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `seeds` is empty or
    /// `product_key` is blank.
    pub async fn scan(
        &self,
        template: &Value,
        seeds: &[LocationSeed],
        product_key: &str,
    ) -> Result<ScanOutcome, ConfigError> {
        if seeds.is_empty() {
            return Err(ConfigError::Validation("seed list is empty".to_string()));
        }
        let product_key = product_key.trim();
        if product_key.is_empty() {
            return Err(ConfigError::Validation("product key is blank".to_string()));
        }

        let rewritable = count_location_fields(template, &self.options.location_fields);
        if rewritable == 0 {
            tracing::warn!(
                "request template has no location fields; every seed will send the same body"
            );
        }

        let started_at = Utc::now();
        tracing::info!(
            seeds = seeds.len(),
            concurrency = self.options.concurrency,
            product_key,
            rewritable,
            "starting scan"
        );

        let pacer = submit_pacer(self.options.inter_request_delay);
        let mut completed: Vec<(usize, LocationSeed, Result<SeedResult, SeedError>)> =
            stream::iter(seeds.iter().enumerate())
                .map(|(index, seed)| {
                    let fut = self.scan_seed(seed, template, product_key, pacer.as_ref());
                    async move { (index, seed.clone(), fut.await) }
                })
                .buffer_unordered(self.options.concurrency.max(1))
                .collect()
                .await;
        completed.sort_by_key(|(index, _, _)| *index);

        let mut results = Vec::new();
        let mut failures = Vec::new();
        for (_, seed, outcome) in completed {
            match outcome {
                Ok(result) => results.push(result),
                Err(error) => failures.push(SeedFailure { seed, error }),
            }
        }

        let finished_at = Utc::now();
        tracing::info!(
            succeeded = results.len(),
            failed = failures.len(),
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "scan finished"
        );

        Ok(ScanOutcome {
            results,
            failures,
            started_at,
            finished_at,
            tie_break: self.options.tie_break,
        })
    }

    async fn scan_seed(
        &self,
        seed: &LocationSeed,
        template: &Value,
        product_key: &str,
        pacer: Option<&Mutex<Interval>>,
    ) -> Result<SeedResult, SeedError> {
        if let Some(pacer) = pacer {
            pacer.lock().await.tick().await;
        }

        let outcome = self.submit_and_normalize(seed, template, product_key).await;
        match &outcome {
            Ok(result) => tracing::info!(
                seed = %seed,
                facts = result.facts.len(),
                stores = result.stores.len(),
                "seed scanned"
            ),
            Err(e) => tracing::warn!(seed = %seed, error = %e, "seed failed"),
        }
        outcome
    }

    async fn submit_and_normalize(
        &self,
        seed: &LocationSeed,
        template: &Value,
        product_key: &str,
    ) -> Result<SeedResult, SeedError> {
        let body = rewrite(template, seed, &self.options.location_fields);
        let timeout = self.options.per_seed_timeout;

        let response = tokio::time::timeout(timeout, self.transport.submit(&body))
            .await
            .map_err(|_| TransportError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })??;

        let mut normalized = normalize(&response, product_key)?;
        if let Some(condition) = &self.options.condition {
            normalized
                .facts
                .retain(|f| f.condition_code.eq_ignore_ascii_case(condition));
        }

        Ok(SeedResult {
            seed: seed.clone(),
            facts: normalized.facts,
            stores: normalized.stores,
        })
    }
}

/// Shared submit clock. The first tick completes immediately, later ticks
/// are at least `delay` apart no matter how many seeds are waiting.
fn submit_pacer(delay: Duration) -> Option<Mutex<Interval>> {
    if delay.is_zero() {
        return None;
    }
    let mut interval = tokio::time::interval(delay);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(Mutex::new(interval))
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod tests;
