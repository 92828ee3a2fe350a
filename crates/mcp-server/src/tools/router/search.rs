use super::{ArgumentExtractor, PaginationPolicy, ToolResult, ToolRouter};

/// `search`: full-text content match under one scope
pub(super) fn run(router: &ToolRouter, args: &ArgumentExtractor<'_>) -> ToolResult<String> {
    let query = args.require_string("query")?;
    let scope = router.scope_argument(args)?;
    let pagination = PaginationPolicy::from_request(args.optional_integer("limit"));

    let predicate = router.builder().natural_text(query);
    router.run_query(&predicate, scope, pagination)
}
