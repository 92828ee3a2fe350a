use spotlight_query::supported_kinds;

use super::{ArgumentExtractor, PaginationPolicy, ToolError, ToolResult, ToolRouter};

/// `search_by_kind`: content-type match for a coarse kind name
pub(super) fn run(router: &ToolRouter, args: &ArgumentExtractor<'_>) -> ToolResult<String> {
    let kind = args.require_string("kind")?;
    let scope = router.scope_argument(args)?;
    let pagination = PaginationPolicy::from_request(args.optional_integer("limit"));

    let predicate = router.builder().kind(kind).ok_or_else(|| {
        let known: Vec<&str> = supported_kinds().collect();
        ToolError::invalid(format!(
            "unknown kind '{kind}', expected one of: {}",
            known.join(", ")
        ))
    })?;
    router.run_query(&predicate, scope, pagination)
}
