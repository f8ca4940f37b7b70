//! Conversion of DynamoDB items into plain JSON.
//!
//! DynamoDB hands numbers back as decimal strings. Everything leaving this
//! module uses ordinary JSON numbers: integers where the value is integral,
//! floats otherwise.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{bail, Context};
use aws_sdk_dynamodb::types::AttributeValue;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

pub fn item_to_json(item: &HashMap<String, AttributeValue>) -> anyhow::Result<Map<String, Value>> {
    item.iter()
        .map(|(key, value)| {
            let value = attribute_to_json(value).with_context(|| format!("attribute '{key}'"))?;
            Ok((key.clone(), value))
        })
        .collect()
}

pub fn attribute_to_json(value: &AttributeValue) -> anyhow::Result<Value> {
    let json = match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number_to_json(n)?,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::B(blob) => bytes_to_json(blob.as_ref()),
        AttributeValue::Ss(items) => items.iter().cloned().map(Value::String).collect(),
        AttributeValue::Ns(items) => items
            .iter()
            .map(|n| number_to_json(n))
            .collect::<anyhow::Result<Value>>()?,
        AttributeValue::Bs(items) => items.iter().map(|b| bytes_to_json(b.as_ref())).collect(),
        AttributeValue::L(items) => items
            .iter()
            .map(attribute_to_json)
            .collect::<anyhow::Result<Value>>()?,
        AttributeValue::M(map) => Value::Object(item_to_json(map)?),
        other => bail!("unsupported attribute value: {other:?}"),
    };
    Ok(json)
}

fn bytes_to_json(bytes: &[u8]) -> Value {
    bytes.iter().map(|b| Value::from(*b)).collect()
}

/// Parses a DynamoDB number string into a JSON number.
pub fn number_to_json(raw: &str) -> anyhow::Result<Value> {
    // DynamoDB allows 38 significant digits, more than `Decimal` holds.
    let Ok(decimal) = Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) else {
        return float_to_json(raw);
    };
    let decimal = decimal.normalize();

    if decimal.scale() == 0 {
        if let Some(int) = decimal.to_i64() {
            return Ok(Value::from(int));
        }
    }

    float_to_json(&decimal.to_string())
}

fn float_to_json(raw: &str) -> anyhow::Result<Value> {
    let float = raw
        .trim()
        .parse::<f64>()
        .with_context(|| format!("'{raw}' is not a number"))?;
    Number::from_f64(float)
        .map(Value::Number)
        .with_context(|| format!("'{raw}' is out of range"))
}

/// Canonicalizes numbers inside an already converted value: floats holding
/// an integral value become integers.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Number(number) => Value::Number(normalize_number(number)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, normalize(v))).collect()),
        other => other,
    }
}

fn normalize_number(number: Number) -> Number {
    match number.as_f64() {
        Some(f) if number.is_f64() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Number::from(f as i64)
        }
        _ => number,
    }
}
