use spotlight_metadata::{AttributeMap, RawValue};
use std::path::{Path, PathBuf};

use crate::error::EngineError;

/// A single item known to the engine
pub trait MetadataItem {
    /// Names of every attribute the item carries
    fn attribute_names(&self) -> Vec<String>;

    fn copy_attribute(&self, name: &str) -> Option<RawValue>;

    /// Every supported attribute, classified into the typed model.
    ///
    /// Attributes whose value cannot be classified are omitted.
    fn attributes(&self) -> AttributeMap {
        let mut out = AttributeMap::new();
        for name in self.attribute_names() {
            let Some(raw) = self.copy_attribute(&name) else {
                continue;
            };
            if let Some(value) = raw.classify() {
                out.insert(name, value);
            }
        }
        out
    }
}

/// A query created from fragment text; run once, then read by index
pub trait EngineQuery {
    /// Restrict matching to items under these directories
    fn set_scope(&mut self, scopes: &[PathBuf]);

    /// Run to completion on the calling thread
    fn execute_synchronous(&mut self) -> Result<(), EngineError>;

    fn result_count(&self) -> usize;

    fn result_at(&self, index: usize) -> Option<&dyn MetadataItem>;
}

/// Backend able to run native query fragments and describe single files
pub trait MetadataEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Parse `query`; a fragment the engine cannot understand fails here
    fn create_query(&self, query: &str) -> Result<Box<dyn EngineQuery + '_>, EngineError>;

    /// Metadata handle for one path, `None` when the engine has nothing for it
    fn item_at_path(&self, path: &Path) -> Option<Box<dyn MetadataItem>>;
}

/// In-memory item with a fixed attribute list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeItem {
    attributes: Vec<(String, RawValue)>,
}

impl AttributeItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Set an attribute, replacing any earlier value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: RawValue) {
        let name = name.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl FromIterator<(String, RawValue)> for AttributeItem {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        let mut item = Self::new();
        for (name, value) in iter {
            item.insert(name, value);
        }
        item
    }
}

impl MetadataItem for AttributeItem {
    fn attribute_names(&self) -> Vec<String> {
        self.attributes.iter().map(|(name, _)| name.clone()).collect()
    }

    fn copy_attribute(&self, name: &str) -> Option<RawValue> {
        self.get(name).cloned()
    }
}
