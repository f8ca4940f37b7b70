use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use super::schema::*;
use super::{NameRecord, NameStore};
use crate::gender::Gender;
use crate::normalize::item_to_json;

/// DynamoDB-backed names table.
#[derive(Clone)]
pub struct DynamoNameStore {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoNameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoNameStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl DynamoNameStore {
    /// Builds the client from the shared SDK config, pointing it at
    /// `endpoint` when one is given (e.g. LocalStack).
    pub fn new(sdk_config: &aws_config::SdkConfig, table_name: String, endpoint: Option<&str>) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            table_name,
        }
    }

    fn to_record(item: &HashMap<String, AttributeValue>) -> anyhow::Result<NameRecord> {
        Ok(NameRecord::new(item_to_json(item)?))
    }
}

#[async_trait]
impl NameStore for DynamoNameStore {
    async fn get(&self, name: &str, gender: Gender) -> anyhow::Result<Option<NameRecord>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_NAME, AttributeValue::S(name.to_string()))
            .key(ATTR_GENDER, AttributeValue::S(gender.code().to_string()))
            .send()
            .await
            .with_context(|| format!("get_item {name}/{}", gender.code()))?;

        output.item.as_ref().map(Self::to_record).transpose()
    }

    async fn first_after(
        &self,
        gender: Gender,
        uuid_floor: &str,
    ) -> anyhow::Result<Option<NameRecord>> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(UUID_INDEX)
            .limit(1)
            .key_condition_expression("#gender = :gender AND #uuid > :floor")
            .expression_attribute_names("#gender", ATTR_GENDER)
            .expression_attribute_names("#uuid", ATTR_UUID)
            .expression_attribute_values(":gender", AttributeValue::S(gender.code().to_string()))
            .expression_attribute_values(":floor", AttributeValue::S(uuid_floor.to_string()))
            .send()
            .await
            .with_context(|| format!("query {UUID_INDEX} {} > {uuid_floor}", gender.code()))?;

        output
            .items
            .unwrap_or_default()
            .first()
            .map(Self::to_record)
            .transpose()
    }
}
