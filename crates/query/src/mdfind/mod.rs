//! Spotlight engine driven through the `mdfind` and `mdls` command-line tools.

mod mdls;

use spotlight_metadata::RawValue;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::attrs;
use crate::engine::{AttributeItem, EngineQuery, MetadataEngine, MetadataItem};
use crate::error::EngineError;

/// Runs queries through `mdfind -0 -onlyin <scope> <query>` and reads attributes with `mdls`
#[derive(Debug, Clone)]
pub struct MdfindEngine {
    mdfind: PathBuf,
    mdls: PathBuf,
}

impl Default for MdfindEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MdfindEngine {
    pub fn new() -> Self {
        Self::with_binaries("mdfind", "mdls")
    }

    pub fn with_binaries(mdfind: impl Into<PathBuf>, mdls: impl Into<PathBuf>) -> Self {
        Self {
            mdfind: mdfind.into(),
            mdls: mdls.into(),
        }
    }
}

impl MetadataEngine for MdfindEngine {
    fn name(&self) -> &'static str {
        "mdfind"
    }

    fn create_query(&self, query: &str) -> Result<Box<dyn EngineQuery + '_>, EngineError> {
        Ok(Box::new(MdfindQuery {
            engine: self,
            query: query.to_string(),
            scopes: Vec::new(),
            items: Vec::new(),
        }))
    }

    fn item_at_path(&self, path: &Path) -> Option<Box<dyn MetadataItem>> {
        match read_attributes(&self.mdls, path) {
            Ok(item) => Some(Box::new(item)),
            Err(err) => {
                log::debug!("No metadata for {}: {err}", path.display());
                None
            }
        }
    }
}

struct MdfindQuery<'e> {
    engine: &'e MdfindEngine,
    query: String,
    scopes: Vec<PathBuf>,
    items: Vec<LazyItem>,
}

impl EngineQuery for MdfindQuery<'_> {
    fn set_scope(&mut self, scopes: &[PathBuf]) {
        self.scopes = scopes.to_vec();
    }

    fn execute_synchronous(&mut self) -> Result<(), EngineError> {
        let mut command = Command::new(&self.engine.mdfind);
        command.arg("-0");
        for scope in &self.scopes {
            command.arg("-onlyin").arg(scope);
        }
        command.arg(&self.query);

        let output = command
            .output()
            .map_err(|err| EngineError::Unavailable(format!("cannot run mdfind: {err}")))?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        // mdfind exits 0 even when it cannot parse the query
        if !output.status.success() || stderr.contains("Failed to create query") {
            return Err(EngineError::execution(stderr.trim().to_string()));
        }

        self.items = output
            .stdout
            .split(|byte| *byte == 0)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| LazyItem {
                mdls: self.engine.mdls.clone(),
                path: PathBuf::from(String::from_utf8_lossy(chunk).into_owned()),
                item: OnceCell::new(),
            })
            .collect();
        Ok(())
    }

    fn result_count(&self) -> usize {
        self.items.len()
    }

    fn result_at(&self, index: usize) -> Option<&dyn MetadataItem> {
        self.items.get(index).map(|item| item as &dyn MetadataItem)
    }
}

/// Result handle whose attributes are fetched with `mdls` on first access
struct LazyItem {
    mdls: PathBuf,
    path: PathBuf,
    item: OnceCell<AttributeItem>,
}

impl LazyItem {
    fn load(&self) -> &AttributeItem {
        self.item.get_or_init(|| {
            read_attributes(&self.mdls, &self.path).unwrap_or_else(|err| {
                log::warn!("mdls failed for {}: {err}", self.path.display());
                let mut item = AttributeItem::new();
                item.insert(
                    attrs::PATH,
                    RawValue::String(self.path.to_string_lossy().into_owned()),
                );
                item
            })
        })
    }
}

impl MetadataItem for LazyItem {
    fn attribute_names(&self) -> Vec<String> {
        self.load().attribute_names()
    }

    fn copy_attribute(&self, name: &str) -> Option<RawValue> {
        self.load().copy_attribute(name)
    }
}

fn read_attributes(mdls: &Path, path: &Path) -> Result<AttributeItem, EngineError> {
    let output = Command::new(mdls)
        .arg(path)
        .output()
        .map_err(|err| EngineError::Unavailable(format!("cannot run mdls: {err}")))?;
    if !output.status.success() {
        return Err(EngineError::execution(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let listing = String::from_utf8_lossy(&output.stdout);
    let entries =
        mdls::parse_listing(&listing).map_err(|err| EngineError::execution(err.to_string()))?;
    let mut item: AttributeItem = entries.into_iter().collect();
    if item.get(attrs::PATH).is_none() {
        item.insert(
            attrs::PATH,
            RawValue::String(path.to_string_lossy().into_owned()),
        );
    }
    Ok(item)
}
