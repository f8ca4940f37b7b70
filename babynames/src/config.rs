use std::env;

use anyhow::{bail, Context};

const DEFAULT_MAX_ATTEMPTS: u32 = 25;

/// Function settings, read from the environment once at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// DynamoDB table holding the name records (`DYNAMO_DB_NAMES`)
    pub table_name: String,
    /// Attempt cap for the random pick (`RANDOM_MAX_ATTEMPTS`)
    pub max_attempts: u32,
    /// Optional endpoint override, e.g. LocalStack (`DYNAMO_DB_ENDPOINT`)
    pub endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let table_name = get("DYNAMO_DB_NAMES")
            .filter(|name| !name.is_empty())
            .context("DYNAMO_DB_NAMES must be set")?;

        let max_attempts = match get("RANDOM_MAX_ATTEMPTS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("RANDOM_MAX_ATTEMPTS is not a number: '{raw}'"))?,
            None => DEFAULT_MAX_ATTEMPTS,
        };
        if max_attempts == 0 {
            bail!("RANDOM_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Self {
            table_name,
            max_attempts,
            endpoint: get("DYNAMO_DB_ENDPOINT").filter(|url| !url.is_empty()),
        })
    }
}
