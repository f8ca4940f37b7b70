//! Name lookup: exact (name, gender) reads and the weighted "Random" pick.

use std::collections::BTreeMap;

use lambda_runtime::tracing::{debug, info, warn};
use rand::Rng;
use uuid::Uuid;

use crate::error::{LookupError, Result};
use crate::gender::{Gender, GenderFilter};
use crate::store::{NameRecord, NameStore};

/// Name that triggers a random pick instead of a key lookup.
pub const RANDOM_NAME: &str = "Random";

/// Random picks must have been counted at least this often in `STATS_YEAR`.
const STATS_YEAR: &str = "2019";
const MIN_COUNTED: f64 = 2.0;

#[derive(Debug, PartialEq)]
pub enum LookupResult {
    NoRecords,
    Found(BTreeMap<Gender, NameRecord>),
}

impl LookupResult {
    fn from_records(records: BTreeMap<Gender, NameRecord>) -> Self {
        if records.is_empty() {
            LookupResult::NoRecords
        } else {
            LookupResult::Found(records)
        }
    }
}

pub struct NameLookup<S> {
    store: S,
    max_attempts: u32,
}

impl<S: NameStore> NameLookup<S> {
    pub fn new(store: S, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn resolve(&self, name: &str, filter: GenderFilter) -> Result<LookupResult> {
        info!(name, ?filter, "resolving name");
        let candidates = filter.candidates();

        let mut records = BTreeMap::new();
        if name == RANDOM_NAME {
            let (sampled, record) = self.random(candidates).await?;
            records.insert(record.gender().unwrap_or(sampled), record);
        } else {
            for &gender in candidates {
                if let Some(record) = self.store.get(name, gender).await? {
                    debug!(?record, "found record");
                    records.insert(record.gender().unwrap_or(gender), record);
                }
            }
        }

        info!(genders = ?records.keys().collect::<Vec<_>>(), "resolved");
        Ok(LookupResult::from_records(records))
    }

    /// Returns the pick together with the index partition it was read from.
    async fn random(&self, candidates: &[Gender]) -> Result<(Gender, NameRecord)> {
        for attempt in 1..=self.max_attempts {
            let (gender, floor) = sample_key(candidates);

            match self.store.first_after(gender, &floor).await {
                Ok(Some(record)) if qualifies(&record) => {
                    debug!(attempt, ?record, "random pick");
                    return Ok((gender, record));
                }
                Ok(Some(record)) => {
                    warn!(attempt, name = record.name(), "random pick below popularity threshold");
                }
                Ok(None) => {
                    warn!(attempt, gender = gender.code(), %floor, "random key past end of index");
                }
                Err(err) => {
                    warn!(attempt, error = %format!("{err:#}"), "random pick failed");
                }
            }
        }

        warn!(attempts = self.max_attempts, "giving up on random pick");
        Err(LookupError::NoQualifyingCandidate {
            attempts: self.max_attempts,
        })
    }
}

/// Picks a gender and a random key fragment to start the index scan from.
/// Kept synchronous so the thread-local rng never lives across an await.
fn sample_key(candidates: &[Gender]) -> (Gender, String) {
    let gender = candidates[rand::thread_rng().gen_range(0..candidates.len())];
    let mut floor = Uuid::new_v4().simple().to_string();
    floor.truncate(8);
    (gender, floor)
}

fn qualifies(record: &NameRecord) -> bool {
    record
        .stat(STATS_YEAR, "counted")
        .and_then(|counted| counted.as_f64())
        .is_some_and(|counted| counted >= MIN_COUNTED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryNameStore;

    fn store() -> MemoryNameStore {
        MemoryNameStore::new()
            .with("Isla", Gender::Girl, "3a", 4001)
            .with("Jordan", Gender::Boy, "5b", 12)
            .with("Jordan", Gender::Girl, "9c", 3)
            .with("Tiny", Gender::Girl, "7", 1)
            .with("Rare", Gender::Boy, "7", 1)
            .with("Zed", Gender::Boy, "ffffffffff", 2)
            .with("Zoe", Gender::Girl, "ffffffffff", 250)
    }

    fn genders(result: &LookupResult) -> Vec<Gender> {
        match result {
            LookupResult::Found(records) => records.keys().copied().collect(),
            LookupResult::NoRecords => vec![],
        }
    }

    #[tokio::test]
    async fn single_gender_only_returns_that_gender() {
        let lookup = NameLookup::new(store(), 10);

        let boys = lookup.resolve("Jordan", GenderFilter::Only(Gender::Boy)).await.unwrap();
        assert_eq!(genders(&boys), vec![Gender::Boy]);

        let girls = lookup.resolve("Jordan", GenderFilter::Only(Gender::Girl)).await.unwrap();
        assert_eq!(genders(&girls), vec![Gender::Girl]);
    }

    #[tokio::test]
    async fn either_considers_both_genders() {
        let lookup = NameLookup::new(store(), 10);

        let both = lookup.resolve("Jordan", GenderFilter::Either).await.unwrap();
        assert_eq!(genders(&both), vec![Gender::Boy, Gender::Girl]);

        let one = lookup.resolve("Isla", GenderFilter::Either).await.unwrap();
        assert_eq!(genders(&one), vec![Gender::Girl]);
    }

    #[tokio::test]
    async fn unknown_name_has_no_records() {
        let lookup = NameLookup::new(store(), 10);

        let result = lookup.resolve("Nobody", GenderFilter::Either).await.unwrap();
        assert_eq!(result, LookupResult::NoRecords);

        let result = lookup.resolve("Isla", GenderFilter::Only(Gender::Boy)).await.unwrap();
        assert_eq!(result, LookupResult::NoRecords);
    }

    #[tokio::test]
    async fn random_pick_meets_threshold() {
        let lookup = NameLookup::new(store(), 200);

        for filter in [
            GenderFilter::Only(Gender::Boy),
            GenderFilter::Only(Gender::Girl),
            GenderFilter::Either,
        ] {
            for _ in 0..20 {
                let result = lookup.resolve(RANDOM_NAME, filter).await.unwrap();
                let LookupResult::Found(records) = result else {
                    panic!("random pick returned no records");
                };
                assert_eq!(records.len(), 1);
                let (gender, record) = records.iter().next().unwrap();
                assert!(filter.candidates().contains(gender));
                assert!(qualifies(record), "{record:?}");
            }
        }
    }

    #[tokio::test]
    async fn random_pick_gives_up_after_max_attempts() {
        let lookup = NameLookup::new(
            MemoryNameStore::new().with("Rare", Gender::Boy, "ffffffffff", 1),
            7,
        );

        let err = lookup
            .resolve(RANDOM_NAME, GenderFilter::Only(Gender::Boy))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NoQualifyingCandidate { attempts: 7 }));
        assert_eq!(lookup.store().range_queries(), 7);
    }

    #[tokio::test]
    async fn random_pick_on_empty_index_gives_up() {
        let lookup = NameLookup::new(MemoryNameStore::new(), 5);

        let err = lookup.resolve(RANDOM_NAME, GenderFilter::Either).await.unwrap_err();
        assert!(matches!(err, LookupError::NoQualifyingCandidate { attempts: 5 }));
        assert_eq!(lookup.store().range_queries(), 5);
    }

    #[tokio::test]
    async fn random_pick_retries_store_errors() {
        let lookup = NameLookup::new(
            MemoryNameStore::new()
                .with("Zoe", Gender::Girl, "ffffffffff", 250)
                .failing_range_queries(),
            3,
        );

        let err = lookup.resolve(RANDOM_NAME, GenderFilter::Either).await.unwrap_err();
        assert!(matches!(err, LookupError::NoQualifyingCandidate { attempts: 3 }));
        assert_eq!(lookup.store().range_queries(), 3);
    }

    #[tokio::test]
    async fn random_pick_without_gender_attribute_keeps_sampled_partition() {
        let lookup = NameLookup::new(
            MemoryNameStore::new().with_fields(
                "Skye",
                Gender::Girl,
                "ffffffffff",
                serde_json::json!({"name": "Skye", "uuid": "ffffffffff", "2019": {"counted": 40}}),
            ),
            50,
        );

        for _ in 0..10 {
            let result = lookup.resolve(RANDOM_NAME, GenderFilter::Either).await.unwrap();
            assert_eq!(genders(&result), vec![Gender::Girl]);
        }
    }

    #[tokio::test]
    async fn random_pick_skips_records_without_stats() {
        let lookup = NameLookup::new(
            MemoryNameStore::new().with_fields(
                "Blank",
                Gender::Boy,
                "ffffffffff",
                serde_json::json!({"name": "Blank", "gender": "B", "uuid": "ffffffffff"}),
            ),
            4,
        );

        let err = lookup
            .resolve(RANDOM_NAME, GenderFilter::Only(Gender::Boy))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NoQualifyingCandidate { attempts: 4 }));
        assert_eq!(lookup.store().range_queries(), 4);
    }

    #[tokio::test]
    async fn exact_lookup_store_errors_propagate() {
        let lookup = NameLookup::new(store().failing_gets(), 10);

        let err = lookup.resolve("Isla", GenderFilter::Either).await.unwrap_err();
        assert!(matches!(err, LookupError::Store(_)));
    }

    #[test]
    fn sampled_keys_are_short_hex() {
        let (gender, floor) = sample_key(&[Gender::Girl]);
        assert_eq!(gender, Gender::Girl);
        assert_eq!(floor.len(), 8);
        assert!(floor.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
