//! Cross-seed aggregation.
//!
//! Facts from every seed are folded into one map keyed by
//! [`AggregateKey`]. A key is never removed during a run; an existing record
//! is replaced only by a strictly more available fact, or by an equally
//! available one that wins the configured [`TieBreak`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use obscan_core::{AggregateKey, AvailabilityFact, LocationSeed, StoreRecord, TieBreak};

/// The retained fact for one key, with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord {
    pub fact: AvailabilityFact,
    /// Seed whose response produced `fact`.
    pub seed: LocationSeed,
    /// Store metadata from the same response, when the join found one.
    pub store: Option<StoreRecord>,
    /// Number of facts merged under this key, across all seeds.
    pub sightings: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    records: BTreeMap<AggregateKey, AggregateRecord>,
    tie_break: TieBreak,
}

impl Aggregate {
    #[must_use]
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            records: BTreeMap::new(),
            tie_break,
        }
    }

    /// Merge one seed's facts. `stores` comes from the same response and is
    /// joined on store id; a fact without a matching store is still kept.
    ///
    /// Returns the number of keys seen for the first time.
    pub fn merge(
        &mut self,
        seed: &LocationSeed,
        facts: &[AvailabilityFact],
        stores: &[StoreRecord],
    ) -> usize {
        let mut index: HashMap<&str, &StoreRecord> = HashMap::with_capacity(stores.len());
        for store in stores {
            index.entry(store.store_id.as_str()).or_insert(store);
        }

        let mut inserted = 0;
        for fact in facts {
            let store = index.get(fact.store_id.as_str()).map(|s| (*s).clone());
            match self.records.get_mut(&fact.key()) {
                Some(current) => {
                    current.sightings = current.sightings.saturating_add(1);
                    if prefers(self.tie_break, current, fact, seed) {
                        current.fact = fact.clone();
                        current.seed = seed.clone();
                        current.store = store;
                    }
                }
                None => {
                    self.records.insert(
                        fact.key(),
                        AggregateRecord {
                            fact: fact.clone(),
                            seed: seed.clone(),
                            store,
                            sightings: 1,
                        },
                    );
                    inserted += 1;
                }
            }
        }
        inserted
    }

    #[must_use]
    pub fn get(&self, key: &AggregateKey) -> Option<&AggregateRecord> {
        self.records.get(key)
    }

    /// Records in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&AggregateKey, &AggregateRecord)> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Availability rank: a positive quantity outranks zero.
fn rank(fact: &AvailabilityFact) -> bool {
    fact.quantity > 0
}

/// Whether `incoming` from `seed` should replace `current`.
fn prefers(
    tie_break: TieBreak,
    current: &AggregateRecord,
    incoming: &AvailabilityFact,
    seed: &LocationSeed,
) -> bool {
    match rank(incoming).cmp(&rank(&current.fact)) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => match tie_break {
            TieBreak::FirstSeen => false,
            TieBreak::LowestSeed => seed < &current.seed,
        },
    }
}
