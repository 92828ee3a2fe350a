use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{DecodeError, Result};

/// Attribute name → value. Ordered so serialized objects always have sorted keys.
pub type AttributeMap = BTreeMap<String, MetadataValue>;

/// A single metadata attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Timestamp(DateTime<Utc>),
    List(Vec<MetadataValue>),
    Map(AttributeMap),
}

/// Calendar-time text used for every encoded timestamp (`2024-01-01T00:00:00Z`)
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl MetadataValue {
    /// Encode as compact JSON text
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode JSON text, trying Text, Integer, Real, Timestamp, List, Map in that order
    pub fn decode(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        decode_at(value, "$")
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Timestamp view of the value; RFC 3339 text also qualifies since decoding yields `Text`.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            Self::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|ts| ts.with_timezone(&Utc)),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Timestamp(_) => "timestamp",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn decode_at(value: &Value, path: &str) -> Result<MetadataValue> {
    if let Some(text) = value.as_str() {
        return Ok(MetadataValue::Text(text.to_string()));
    }
    if let Some(int) = value.as_i64() {
        return Ok(MetadataValue::Integer(int));
    }
    if let Some(real) = value.as_f64() {
        return Ok(MetadataValue::Real(real));
    }
    // Timestamp has no JSON shape of its own: its text form was already claimed by Text.
    if let Some(items) = value.as_array() {
        let list = items
            .iter()
            .enumerate()
            .map(|(idx, item)| decode_at(item, &format!("{path}[{idx}]")))
            .collect::<Result<Vec<_>>>()?;
        return Ok(MetadataValue::List(list));
    }
    if let Some(object) = value.as_object() {
        let mut map = AttributeMap::new();
        for (key, item) in object {
            map.insert(key.clone(), decode_at(item, &format!("{path}.{key}"))?);
        }
        return Ok(MetadataValue::Map(map));
    }

    Err(DecodeError::data_corrupted(
        path,
        format!("unable to decode metadata value from {}", json_shape(value)),
    ))
}

impl Serialize for MetadataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Real(value) => serializer.serialize_f64(*value),
            Self::Timestamp(ts) => serializer.serialize_str(&format_timestamp(ts)),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, item) in map {
                    out.serialize_entry(key, item)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for MetadataValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<DateTime<Utc>> for MetadataValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Vec<MetadataValue>> for MetadataValue {
    fn from(value: Vec<MetadataValue>) -> Self {
        Self::List(value)
    }
}

impl From<AttributeMap> for MetadataValue {
    fn from(value: AttributeMap) -> Self {
        Self::Map(value)
    }
}
