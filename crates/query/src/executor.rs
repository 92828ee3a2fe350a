use spotlight_metadata::{RawValue, SearchResult};
use std::path::PathBuf;

use crate::attrs;
use crate::engine::{MetadataEngine, MetadataItem};
use crate::error::QueryError;
use crate::predicate::Predicate;

/// Runs one query over a set of scope directories
pub struct QueryExecutor<'e> {
    engine: &'e dyn MetadataEngine,
    query: String,
    scopes: Vec<PathBuf>,
    max_results: Option<usize>,
}

impl<'e> QueryExecutor<'e> {
    pub fn from_predicate(
        engine: &'e dyn MetadataEngine,
        predicate: &Predicate,
        scopes: Vec<PathBuf>,
    ) -> Self {
        Self::from_query_string(engine, predicate.as_str(), scopes)
    }

    pub fn from_query_string(
        engine: &'e dyn MetadataEngine,
        query: impl Into<String>,
        scopes: Vec<PathBuf>,
    ) -> Self {
        Self {
            engine,
            query: query.into(),
            scopes,
            max_results: None,
        }
    }

    /// Stop collecting after `max` results. Engine result order is kept.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Run synchronously and project every handle into a [`SearchResult`].
    ///
    /// Handles without a textual `kMDItemPath` are skipped.
    pub fn execute(&self) -> Result<Vec<SearchResult>, QueryError> {
        if self.scopes.is_empty() {
            return Err(QueryError::InvalidScope);
        }

        let mut query = self.engine.create_query(&self.query)?;
        query.set_scope(&self.scopes);
        query.execute_synchronous()?;

        let count = query.result_count();
        let cap = self.max_results.unwrap_or(usize::MAX);
        let mut results = Vec::with_capacity(count.min(cap));
        for index in 0..count {
            if results.len() >= cap {
                break;
            }
            let Some(item) = query.result_at(index) else {
                continue;
            };
            match project(item) {
                Some(result) => results.push(result),
                None => log::debug!("Skipping result {index}: no textual path attribute"),
            }
        }

        log::debug!(
            "{} query matched {} item(s), kept {}",
            self.engine.name(),
            count,
            results.len()
        );
        Ok(results)
    }
}

fn project(item: &dyn MetadataItem) -> Option<SearchResult> {
    let path = match item.copy_attribute(attrs::PATH)? {
        RawValue::String(path) => path,
        _ => return None,
    };
    Some(SearchResult::new(path, item.attributes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AttributeItem, EngineQuery};
    use crate::error::EngineError;
    use pretty_assertions::assert_eq;
    use spotlight_metadata::MetadataValue;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubEngine {
        items: Vec<AttributeItem>,
        reject_query: bool,
        fail_execution: bool,
        created: AtomicUsize,
        last_scopes: Mutex<Vec<PathBuf>>,
    }

    struct StubQuery<'a> {
        engine: &'a StubEngine,
        executed: bool,
    }

    impl EngineQuery for StubQuery<'_> {
        fn set_scope(&mut self, scopes: &[PathBuf]) {
            *self.engine.last_scopes.lock().unwrap() = scopes.to_vec();
        }

        fn execute_synchronous(&mut self) -> Result<(), EngineError> {
            if self.engine.fail_execution {
                return Err(EngineError::execution("index unavailable"));
            }
            self.executed = true;
            Ok(())
        }

        fn result_count(&self) -> usize {
            if self.executed {
                self.engine.items.len()
            } else {
                0
            }
        }

        fn result_at(&self, index: usize) -> Option<&dyn MetadataItem> {
            self.engine
                .items
                .get(index)
                .map(|item| item as &dyn MetadataItem)
        }
    }

    impl MetadataEngine for StubEngine {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn create_query(&self, query: &str) -> Result<Box<dyn EngineQuery + '_>, EngineError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            if self.reject_query {
                return Err(EngineError::invalid_query(query));
            }
            Ok(Box::new(StubQuery {
                engine: self,
                executed: false,
            }))
        }

        fn item_at_path(&self, _path: &Path) -> Option<Box<dyn MetadataItem>> {
            None
        }
    }

    fn file(path: &str) -> AttributeItem {
        AttributeItem::new()
            .with(attrs::PATH, RawValue::String(path.to_string()))
            .with(attrs::FS_SIZE, RawValue::Integer(10))
    }

    #[test]
    fn empty_scope_fails_before_touching_engine() {
        let engine = StubEngine::default();
        let err = QueryExecutor::from_query_string(&engine, "kMDItemFSSize > 0", vec![])
            .execute()
            .unwrap_err();
        assert_eq!(err, QueryError::InvalidScope);
        assert_eq!(engine.created.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn projects_results_in_engine_order() {
        let engine = StubEngine {
            items: vec![file("/b"), file("/a")],
            ..Default::default()
        };
        let results =
            QueryExecutor::from_query_string(&engine, "q", vec![PathBuf::from("/tmp")])
                .execute()
                .unwrap();

        let paths: Vec<_> = results.iter().map(|r| r.path().to_path_buf()).collect();
        assert_eq!(paths, vec![PathBuf::from("/b"), PathBuf::from("/a")]);
        assert_eq!(
            results[0].attributes()[attrs::FS_SIZE],
            MetadataValue::Integer(10)
        );
        assert_eq!(
            *engine.last_scopes.lock().unwrap(),
            vec![PathBuf::from("/tmp")]
        );
    }

    #[test]
    fn handles_without_textual_path_are_dropped() {
        let engine = StubEngine {
            items: vec![
                file("/kept"),
                AttributeItem::new().with(attrs::FS_SIZE, RawValue::Integer(1)),
                AttributeItem::new().with(attrs::PATH, RawValue::Integer(7)),
            ],
            ..Default::default()
        };
        let results = QueryExecutor::from_query_string(&engine, "q", vec![PathBuf::from("/")])
            .execute()
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path(), Path::new("/kept"));
    }

    #[test]
    fn max_results_caps_collection() {
        let engine = StubEngine {
            items: (0..10).map(|i| file(&format!("/f{i}"))).collect(),
            ..Default::default()
        };
        let results = QueryExecutor::from_query_string(&engine, "q", vec![PathBuf::from("/")])
            .with_max_results(3)
            .execute()
            .unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[2].path(), Path::new("/f2"));
    }

    #[test]
    fn rejected_query_is_execution_failure() {
        let engine = StubEngine {
            reject_query: true,
            ..Default::default()
        };
        let err = QueryExecutor::from_query_string(&engine, "((", vec![PathBuf::from("/")])
            .execute()
            .unwrap_err();
        assert!(matches!(err, QueryError::ExecutionFailed(_)), "{err}");
    }

    #[test]
    fn engine_execution_error_is_execution_failure() {
        let engine = StubEngine {
            fail_execution: true,
            ..Default::default()
        };
        let err = QueryExecutor::from_query_string(&engine, "q", vec![PathBuf::from("/")])
            .execute()
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::ExecutionFailed("Execution error: index unavailable".to_string())
        );
    }
}
