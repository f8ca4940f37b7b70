use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{NameRecord, NameStore};
use crate::gender::Gender;

/// In-memory names table with an ordered (gender, uuid) index.
#[derive(Default)]
pub(crate) struct MemoryNameStore {
    by_key: BTreeMap<(String, Gender), NameRecord>,
    by_uuid: BTreeMap<(Gender, String), NameRecord>,
    fail_gets: bool,
    fail_range_queries: bool,
    range_queries: AtomicUsize,
}

impl MemoryNameStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a record with the given 2019 count.
    pub(crate) fn with(self, name: &str, gender: Gender, uuid: &str, counted: i64) -> Self {
        let fields = json!({
            "name": name,
            "gender": gender.code(),
            "uuid": uuid,
            "2019": {"counted": counted, "rank": 1},
        });
        self.with_fields(name, gender, uuid, fields)
    }

    /// Adds a record holding exactly `fields`, stored under the given keys.
    pub(crate) fn with_fields(mut self, name: &str, gender: Gender, uuid: &str, fields: Value) -> Self {
        let Value::Object(fields) = fields else {
            panic!("record fields must be an object")
        };
        let record = NameRecord::new(fields);
        self.by_key
            .insert((name.to_string(), gender), record.clone());
        self.by_uuid.insert((gender, uuid.to_string()), record);
        self
    }

    pub(crate) fn failing_gets(mut self) -> Self {
        self.fail_gets = true;
        self
    }

    pub(crate) fn failing_range_queries(mut self) -> Self {
        self.fail_range_queries = true;
        self
    }

    pub(crate) fn range_queries(&self) -> usize {
        self.range_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameStore for MemoryNameStore {
    async fn get(&self, name: &str, gender: Gender) -> anyhow::Result<Option<NameRecord>> {
        if self.fail_gets {
            anyhow::bail!("provisioned throughput exceeded");
        }
        Ok(self.by_key.get(&(name.to_string(), gender)).cloned())
    }

    async fn first_after(
        &self,
        gender: Gender,
        uuid_floor: &str,
    ) -> anyhow::Result<Option<NameRecord>> {
        self.range_queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_range_queries {
            anyhow::bail!("throttled");
        }
        Ok(self
            .by_uuid
            .range((gender, uuid_floor.to_string())..)
            .take_while(|((g, _), _)| *g == gender)
            .find(|((_, uuid), _)| uuid.as_str() > uuid_floor)
            .map(|(_, record)| record.clone()))
    }
}
