use chrono::{DateTime, Utc};

use crate::value::{AttributeMap, MetadataValue};

/// Untyped attribute value as handed back by a metadata engine.
///
/// Engines report whatever the index stored; anything outside the six supported shapes
/// (booleans, binary blobs, nulls, ...) arrives as `Unsupported` with a short shape name.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    String(String),
    Integer(i64),
    Float(f64),
    Date(DateTime<Utc>),
    Array(Vec<RawValue>),
    Dictionary(Vec<(String, RawValue)>),
    Unsupported(String),
}

impl RawValue {
    /// Number carrying the engine's float flag
    pub fn number(value: f64, is_float: bool) -> Self {
        if is_float || value.fract() != 0.0 || !value.is_finite() {
            Self::Float(value)
        } else {
            Self::Integer(value as i64)
        }
    }

    pub fn unsupported(shape: impl Into<String>) -> Self {
        Self::Unsupported(shape.into())
    }

    /// Map onto the typed model.
    ///
    /// Returns `None` only when the value itself is unsupported. Unsupported entries nested
    /// inside arrays or dictionaries are dropped and the rest of the collection is kept.
    pub fn classify(&self) -> Option<MetadataValue> {
        match self {
            Self::String(text) => Some(MetadataValue::Text(text.clone())),
            Self::Integer(value) => Some(MetadataValue::Integer(*value)),
            Self::Float(value) => Some(MetadataValue::Real(*value)),
            Self::Date(ts) => Some(MetadataValue::Timestamp(*ts)),
            Self::Array(items) => Some(MetadataValue::List(
                items.iter().filter_map(RawValue::classify).collect(),
            )),
            Self::Dictionary(entries) => {
                let mut map = AttributeMap::new();
                for (key, item) in entries {
                    if let Some(value) = item.classify() {
                        map.insert(key.clone(), value);
                    }
                }
                Some(MetadataValue::Map(map))
            }
            Self::Unsupported(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn float_flag_decides_numeric_variant() {
        assert_eq!(RawValue::number(3.0, false), RawValue::Integer(3));
        assert_eq!(RawValue::number(3.0, true), RawValue::Float(3.0));
        assert_eq!(RawValue::number(3.5, false), RawValue::Float(3.5));
    }

    #[test]
    fn unsupported_top_level_value_is_not_classified() {
        assert_eq!(RawValue::unsupported("bool").classify(), None);
    }

    #[test]
    fn unsupported_entries_inside_collections_are_dropped() {
        let raw = RawValue::Array(vec![
            RawValue::String("a".into()),
            RawValue::unsupported("data"),
            RawValue::Dictionary(vec![
                ("keep".into(), RawValue::Integer(1)),
                ("drop".into(), RawValue::unsupported("null")),
            ]),
        ]);

        let mut inner = AttributeMap::new();
        inner.insert("keep".into(), MetadataValue::Integer(1));
        assert_eq!(
            raw.classify(),
            Some(MetadataValue::List(vec![
                MetadataValue::Text("a".into()),
                MetadataValue::Map(inner),
            ]))
        );
    }

    #[test]
    fn duplicate_dictionary_keys_keep_last_value() {
        let raw = RawValue::Dictionary(vec![
            ("k".into(), RawValue::Integer(1)),
            ("k".into(), RawValue::Integer(2)),
        ]);
        let Some(MetadataValue::Map(map)) = raw.classify() else {
            panic!("expected map");
        };
        assert_eq!(map.len(), 1);
        assert_eq!(map["k"], MetadataValue::Integer(2));
    }
}
