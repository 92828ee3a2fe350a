use std::path::{Path, PathBuf};

use crate::value::AttributeMap;

/// One matched item: its absolute path and every attribute the engine reported for it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    path: PathBuf,
    attributes: AttributeMap,
}

impl SearchResult {
    pub fn new(path: impl Into<PathBuf>, attributes: AttributeMap) -> Self {
        Self {
            path: path.into(),
            attributes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn into_parts(self) -> (PathBuf, AttributeMap) {
        (self.path, self.attributes)
    }
}
