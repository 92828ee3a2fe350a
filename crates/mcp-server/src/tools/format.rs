use serde_json::{Map, Value};
use spotlight_metadata::{AttributeMap, MetadataValue, SearchResult};

/// Key injected into every search result object
pub const PATH_KEY: &str = "_path";

/// Canonical JSON rendering of tool results; object keys are always sorted.
pub struct ResultFormatter;

impl ResultFormatter {
    /// JSON array of attribute objects, each with `_path`. Empty input gives `[]`.
    pub fn format_results(results: &[SearchResult]) -> String {
        let items: Vec<Value> = results.iter().map(result_object).collect();
        serde_json::to_string(&items).unwrap_or_else(|err| {
            log::error!("Failed to serialize search results: {err}");
            "[]".to_string()
        })
    }

    /// One attribute object. Empty input gives `{}`.
    pub fn format_attributes(attributes: &AttributeMap) -> String {
        serde_json::to_string(attributes).unwrap_or_else(|err| {
            log::error!("Failed to serialize attributes: {err}");
            "{}".to_string()
        })
    }
}

fn result_object(result: &SearchResult) -> Value {
    let mut object = Map::new();
    for (key, value) in result.attributes() {
        object.insert(key.clone(), to_json(value));
    }
    object.insert(
        PATH_KEY.to_string(),
        Value::String(result.path().to_string_lossy().into_owned()),
    );
    sorted(Value::Object(object))
}

fn to_json(value: &MetadataValue) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Rebuild objects in key order; `serde_json::Map` may preserve insertion order instead.
fn sorted(value: Value) -> Value {
    match value {
        Value::Object(object) => {
            let mut entries: Vec<(String, Value)> = object.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, sorted(item)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}
