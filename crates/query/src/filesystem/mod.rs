//! Index-free engine: walks scope directories and evaluates the query fragment per file.

mod content_type;

use chrono::{DateTime, Utc};
use spotlight_metadata::RawValue;
use std::cell::OnceCell;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::attrs;
use crate::engine::{AttributeItem, EngineQuery, MetadataEngine, MetadataItem};
use crate::error::EngineError;
use crate::filter::{AttributeSource, Filter};

/// Metadata engine backed by a plain directory walk.
///
/// Attributes are synthesized from file-system metadata and the file extension. Hidden
/// entries (leading `.`) are skipped. `kMDItemTextContent` is only read for text-like files
/// and only when the query references it.
#[derive(Debug, Clone)]
pub struct FilesystemEngine {
    text_content_max_bytes: u64,
}

impl Default for FilesystemEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FilesystemEngine {
    pub const DEFAULT_TEXT_CONTENT_MAX_BYTES: u64 = 4 * 1024 * 1024;

    pub fn new() -> Self {
        Self {
            text_content_max_bytes: Self::DEFAULT_TEXT_CONTENT_MAX_BYTES,
        }
    }

    /// Bytes of each file read when matching against text content
    pub fn with_text_content_max_bytes(mut self, max_bytes: u64) -> Self {
        self.text_content_max_bytes = max_bytes;
        self
    }

    pub fn text_content_max_bytes(&self) -> u64 {
        self.text_content_max_bytes
    }
}

impl MetadataEngine for FilesystemEngine {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    fn create_query(&self, query: &str) -> Result<Box<dyn EngineQuery + '_>, EngineError> {
        let filter = Filter::parse(query).map_err(|err| EngineError::invalid_query(err.to_string()))?;
        Ok(Box::new(FilesystemQuery {
            engine: self,
            reads_text: filter.references(attrs::TEXT_CONTENT),
            filter,
            scopes: Vec::new(),
            results: Vec::new(),
        }))
    }

    fn item_at_path(&self, path: &Path) -> Option<Box<dyn MetadataItem>> {
        let meta = fs::metadata(path).ok()?;
        Some(Box::new(describe(path, &meta)))
    }
}

struct FilesystemQuery<'e> {
    engine: &'e FilesystemEngine,
    filter: Filter,
    reads_text: bool,
    scopes: Vec<PathBuf>,
    results: Vec<AttributeItem>,
}

impl EngineQuery for FilesystemQuery<'_> {
    fn set_scope(&mut self, scopes: &[PathBuf]) {
        self.scopes = scopes.to_vec();
    }

    fn execute_synchronous(&mut self) -> Result<(), EngineError> {
        self.results.clear();
        let mut seen = HashSet::new();

        for scope in &self.scopes {
            let walker = WalkDir::new(scope)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        log::debug!("Skipping unreadable entry under {}: {err}", scope.display());
                        continue;
                    }
                };
                if !entry.file_type().is_file() || !seen.insert(entry.path().to_path_buf()) {
                    continue;
                }
                let meta = match entry.metadata() {
                    Ok(meta) => meta,
                    Err(err) => {
                        log::debug!("Skipping {}: {err}", entry.path().display());
                        continue;
                    }
                };

                let item = describe(entry.path(), &meta);
                let candidate = Candidate {
                    item: &item,
                    path: entry.path(),
                    max_bytes: if self.reads_text {
                        self.engine.text_content_max_bytes
                    } else {
                        0
                    },
                    text: OnceCell::new(),
                };
                if self.filter.matches(&candidate) {
                    self.results.push(item);
                }
            }
        }
        Ok(())
    }

    fn result_count(&self) -> usize {
        self.results.len()
    }

    fn result_at(&self, index: usize) -> Option<&dyn MetadataItem> {
        self.results
            .get(index)
            .map(|item| item as &dyn MetadataItem)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

struct Candidate<'a> {
    item: &'a AttributeItem,
    path: &'a Path,
    max_bytes: u64,
    text: OnceCell<Option<String>>,
}

impl Candidate<'_> {
    fn text_content(&self) -> Option<String> {
        self.text
            .get_or_init(|| {
                let is_text = self
                    .item
                    .get(attrs::CONTENT_TYPE_TREE)
                    .is_some_and(|tree| contains_text_type(tree));
                if !is_text || self.max_bytes == 0 {
                    return None;
                }
                read_prefix(self.path, self.max_bytes)
            })
            .clone()
    }
}

impl AttributeSource for Candidate<'_> {
    fn attribute(&self, name: &str) -> Option<RawValue> {
        if name == attrs::TEXT_CONTENT {
            return self.text_content().map(RawValue::String);
        }
        self.item.get(name).cloned()
    }
}

fn contains_text_type(tree: &RawValue) -> bool {
    match tree {
        RawValue::Array(items) => items.iter().any(|item| item.as_str() == Some("public.text")),
        _ => false,
    }
}

fn read_prefix(path: &Path, max_bytes: u64) -> Option<String> {
    let file = File::open(path)
        .map_err(|err| log::debug!("Cannot read {}: {err}", path.display()))
        .ok()?;
    let mut buf = Vec::new();
    file.take(max_bytes)
        .read_to_end(&mut buf)
        .map_err(|err| log::debug!("Cannot read {}: {err}", path.display()))
        .ok()?;
    Some(String::from_utf8_lossy(&buf).into_owned())
}

fn describe(path: &Path, meta: &fs::Metadata) -> AttributeItem {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = content_type::for_path(path, meta.is_dir());
    let tree = content_type
        .tree()
        .into_iter()
        .map(|identifier| RawValue::String(identifier.to_string()))
        .collect();

    let mut item = AttributeItem::new()
        .with(attrs::PATH, RawValue::String(path.to_string_lossy().into_owned()))
        .with(attrs::FS_NAME, RawValue::String(name.clone()))
        .with(attrs::DISPLAY_NAME, RawValue::String(name))
        .with(
            attrs::FS_SIZE,
            RawValue::Integer(i64::try_from(meta.len()).unwrap_or(i64::MAX)),
        )
        .with(
            attrs::CONTENT_TYPE,
            RawValue::String(content_type.identifier().to_string()),
        )
        .with(attrs::CONTENT_TYPE_TREE, RawValue::Array(tree));

    if let Ok(modified) = meta.modified() {
        let modified = DateTime::<Utc>::from(modified);
        item.insert(attrs::CONTENT_MODIFICATION_DATE, RawValue::Date(modified));
        item.insert(attrs::FS_CONTENT_CHANGE_DATE, RawValue::Date(modified));
    }
    if let Ok(created) = meta.created() {
        let created = DateTime::<Utc>::from(created);
        item.insert(attrs::CONTENT_CREATION_DATE, RawValue::Date(created));
        item.insert(attrs::FS_CREATION_DATE, RawValue::Date(created));
    }
    item
}
