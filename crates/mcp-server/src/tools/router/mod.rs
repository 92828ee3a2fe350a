//! Tool dispatch: one entry point per invocation, one place where errors become payloads.

mod get_metadata;
mod recent_files;
mod search;
mod search_by_kind;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::{Map, Value};
use spotlight_query::{MetadataEngine, Predicate, QueryBuilder, QueryExecutor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::args::ArgumentExtractor;
use super::error::{ToolError, ToolResult};
use super::format::ResultFormatter;
use super::pagination::PaginationPolicy;
use super::paths::PathValidator;

/// How strictly `scope` arguments are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScopePolicy {
    /// Absolute path only; the engine decides what a missing directory means
    #[default]
    Lenient,
    /// Must be an existing, listable directory
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    Search,
    GetMetadata,
    SearchByKind,
    RecentFiles,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [
        Self::Search,
        Self::GetMetadata,
        Self::SearchByKind,
        Self::RecentFiles,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::GetMetadata => "get_metadata",
            Self::SearchByKind => "search_by_kind",
            Self::RecentFiles => "recent_files",
        }
    }
}

/// Outcome of one invocation as the caller sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub text: String,
    pub is_error: bool,
}

impl ToolResponse {
    pub fn success(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    pub fn error(err: &ToolError) -> Self {
        Self {
            text: err.message(),
            is_error: true,
        }
    }

    pub fn into_call_tool_result(self) -> CallToolResult {
        if self.is_error {
            CallToolResult::error(vec![Content::text(self.text)])
        } else {
            CallToolResult::success(vec![Content::text(self.text)])
        }
    }
}

/// Maps tool names to handlers over a shared metadata engine
pub struct ToolRouter {
    engine: Arc<dyn MetadataEngine>,
    builder: QueryBuilder,
    scope_policy: ScopePolicy,
    allowed_roots: Vec<PathBuf>,
}

impl ToolRouter {
    pub fn new(engine: Arc<dyn MetadataEngine>) -> Self {
        Self {
            engine,
            builder: QueryBuilder::new(),
            scope_policy: ScopePolicy::default(),
            allowed_roots: Vec::new(),
        }
    }

    pub fn with_scope_policy(mut self, policy: ScopePolicy) -> Self {
        self.scope_policy = policy;
        self
    }

    /// Restrict every scope and metadata path to these directories
    pub fn with_allowed_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.allowed_roots = roots;
        self
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Run one tool invocation to completion
    pub fn call(&self, name: &str, args: Option<&Map<String, Value>>) -> ToolResponse {
        log::debug!("Tool call: {name}");
        let args = ArgumentExtractor::new(args);
        let outcome = match ToolName::parse(name) {
            Some(tool) => self.dispatch(tool, &args),
            None => Err(ToolError::UnknownTool(name.to_string())),
        };

        match outcome {
            Ok(text) => ToolResponse::success(text),
            Err(err) => {
                log_failure(name, &err);
                ToolResponse::error(&err)
            }
        }
    }

    /// Run a caller-written query fragment under `scope`
    pub fn call_raw(&self, fragment: &str, scope: &Path, limit: Option<i64>) -> ToolResponse {
        let outcome = self
            .builder
            .raw_predicate(fragment)
            .map_err(ToolError::from)
            .and_then(|predicate| {
                let scope = self.checked_scope(scope.to_path_buf())?;
                self.run_query(&predicate, scope, PaginationPolicy::from_request(limit))
            });
        match outcome {
            Ok(text) => ToolResponse::success(text),
            Err(err) => {
                log_failure("raw_query", &err);
                ToolResponse::error(&err)
            }
        }
    }

    fn dispatch(&self, tool: ToolName, args: &ArgumentExtractor<'_>) -> ToolResult<String> {
        match tool {
            ToolName::Search => search::run(self, args),
            ToolName::GetMetadata => get_metadata::run(self, args),
            ToolName::SearchByKind => search_by_kind::run(self, args),
            ToolName::RecentFiles => recent_files::run(self, args),
        }
    }

    fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    fn engine(&self) -> &dyn MetadataEngine {
        self.engine.as_ref()
    }

    /// Read the `scope` argument under the configured policy and allowed roots
    fn scope_argument(&self, args: &ArgumentExtractor<'_>) -> ToolResult<PathBuf> {
        let scope = match self.scope_policy {
            ScopePolicy::Lenient => args.require_absolute_path("scope")?,
            ScopePolicy::Strict => args.require_validated_scope("scope")?,
        };
        self.check_allowed(&scope)?;
        Ok(scope)
    }

    fn checked_scope(&self, scope: PathBuf) -> ToolResult<PathBuf> {
        if !scope.is_absolute() {
            return Err(ToolError::invalid(format!(
                "'scope' must be an absolute path, got '{}'",
                scope.display()
            )));
        }
        let scope = match self.scope_policy {
            ScopePolicy::Lenient => scope,
            ScopePolicy::Strict => PathValidator::validate_scope_exists(&scope)?,
        };
        self.check_allowed(&scope)?;
        Ok(scope)
    }

    fn check_allowed(&self, path: &Path) -> ToolResult<()> {
        PathValidator::validate_within_any(path, &self.allowed_roots).map(|_| ())
    }

    fn run_query(
        &self,
        predicate: &Predicate,
        scope: PathBuf,
        pagination: PaginationPolicy,
    ) -> ToolResult<String> {
        if predicate.is_raw() {
            log::info!("Running caller-supplied predicate: {predicate}");
        }
        let results = QueryExecutor::from_predicate(self.engine(), predicate, vec![scope])
            .with_max_results(pagination.limit())
            .execute()?;
        Ok(ResultFormatter::format_results(&pagination.apply(results)))
    }
}

fn log_failure(tool: &str, err: &ToolError) {
    match err {
        ToolError::MissingArgument(_)
        | ToolError::InvalidArgument(_)
        | ToolError::FileNotFound(_)
        | ToolError::UnknownTool(_) => log::warn!("{tool}: {err}"),
        ToolError::QueryFailed(_) => log::error!("{tool}: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use spotlight_query::FilesystemEngine;

    fn router() -> ToolRouter {
        ToolRouter::new(Arc::new(FilesystemEngine::new()))
    }

    fn call(router: &ToolRouter, name: &str, args: Value) -> ToolResponse {
        router.call(name, args.as_object())
    }

    #[test]
    fn tool_names_round_trip() {
        for tool in ToolName::ALL {
            assert_eq!(ToolName::parse(tool.as_str()), Some(tool));
        }
        assert_eq!(ToolName::parse("Search"), None);
    }

    #[test]
    fn unknown_tool_is_error_payload() {
        let response = call(&router(), "delete_everything", json!({}));
        assert!(response.is_error);
        assert_eq!(response.text, "Unknown tool: delete_everything");
    }

    #[test]
    fn response_serializes_camel_case() {
        let response = ToolResponse::error(&ToolError::missing("scope"));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "text": "Missing required argument: scope", "isError": true })
        );
    }

    #[test]
    fn strict_policy_rejects_missing_scope_directory() {
        let strict = router().with_scope_policy(ScopePolicy::Strict);
        let response = call(
            &strict,
            "search",
            json!({ "query": "x", "scope": "/nonexistent/spotlight/scope" }),
        );
        assert!(response.is_error);
        assert!(response.text.starts_with("Invalid argument:"), "{}", response.text);

        let lenient = call(
            &router(),
            "search",
            json!({ "query": "x", "scope": "/nonexistent/spotlight/scope" }),
        );
        assert_eq!(lenient, ToolResponse::success("[]".to_string()));
    }

    #[test]
    fn allowed_roots_reject_outside_scope() {
        let dir = tempfile::TempDir::new().unwrap();
        let allowed = dir.path().join("allowed");
        std::fs::create_dir_all(&allowed).unwrap();
        let router = router().with_allowed_roots(vec![allowed]);

        let response = call(
            &router,
            "recent_files",
            json!({ "scope": dir.path().to_string_lossy() }),
        );
        assert!(response.is_error);
        assert!(response.text.contains("allowed roots"), "{}", response.text);
    }

    #[test]
    fn raw_fragments_run_through_the_engine() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("big.bin"), vec![0_u8; 2048]).unwrap();
        std::fs::write(dir.path().join("small.bin"), vec![0_u8; 10]).unwrap();
        let router = router();

        let response = router.call_raw("kMDItemFSSize > 1000", dir.path(), None);
        assert!(!response.is_error, "{}", response.text);
        let items: Vec<Value> = serde_json::from_str(&response.text).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["kMDItemFSName"], json!("big.bin"));

        let empty = router.call_raw("  ", dir.path(), None);
        assert!(empty.is_error);

        let malformed = router.call_raw("kMDItemFSSize >", dir.path(), None);
        assert!(malformed.text.starts_with("Query failed:"), "{}", malformed.text);
    }

    #[test]
    fn out_of_range_time_offset_is_query_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let response = router().call_raw(
            "kMDItemContentModificationDate >= $time.now(9223372036854775807)",
            dir.path(),
            None,
        );
        assert!(response.is_error);
        assert!(response.text.starts_with("Query failed:"), "{}", response.text);
        assert!(response.text.contains("out of range"), "{}", response.text);
    }
}
