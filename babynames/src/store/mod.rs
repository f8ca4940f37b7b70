//! Read access to the names table.

mod dynamo;
#[cfg(test)]
pub(crate) mod memory;
pub mod schema;

pub use dynamo::DynamoNameStore;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::gender::Gender;
use crate::normalize::normalize;

/// One (name, gender) row, with every number already converted to a plain
/// JSON number.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NameRecord(Map<String, Value>);

impl NameRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        NameRecord(fields.into_iter().map(|(k, v)| (k, normalize(v))).collect())
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get(schema::ATTR_NAME).and_then(Value::as_str)
    }

    pub fn gender(&self) -> Option<Gender> {
        self.0
            .get(schema::ATTR_GENDER)
            .and_then(Value::as_str)
            .and_then(Gender::from_code)
    }

    /// A single statistic for one year, e.g. `stat("2019", "counted")`.
    pub fn stat(&self, year: &str, field: &str) -> Option<&Value> {
        self.0.get(year)?.get(field)
    }
}

#[async_trait]
pub trait NameStore: Send + Sync {
    /// Direct key lookup on (name, gender).
    async fn get(&self, name: &str, gender: Gender) -> anyhow::Result<Option<NameRecord>>;

    /// First record of `gender` whose uuid sorts strictly after `uuid_floor`.
    /// `None` when the floor is past the end of the index.
    async fn first_after(
        &self,
        gender: Gender,
        uuid_floor: &str,
    ) -> anyhow::Result<Option<NameRecord>>;
}
