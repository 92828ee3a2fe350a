use chrono::{DateTime, Duration, NaiveDate, Utc};
use spotlight_metadata::format_timestamp;

use super::{ArgumentExtractor, PaginationPolicy, ToolError, ToolResult, ToolRouter};

const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// `recent_files`: modification date at or after `since`
pub(super) fn run(router: &ToolRouter, args: &ArgumentExtractor<'_>) -> ToolResult<String> {
    let scope = router.scope_argument(args)?;
    let since = match args.optional_string("since") {
        Some(text) => parse_since(text)?,
        None => Utc::now() - Duration::days(DEFAULT_LOOKBACK_DAYS),
    };
    let pagination = PaginationPolicy::from_request(args.optional_integer("limit"));

    let predicate = router.builder().modified_since(&format_timestamp(&since));
    router.run_query(&predicate, scope, pagination)
}

/// RFC 3339 date-time, or a bare `YYYY-MM-DD` read as UTC midnight
fn parse_since(text: &str) -> ToolResult<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            ToolError::invalid(format!(
                "'since' must be an ISO-8601 date (e.g. 2024-01-01T00:00:00Z), got '{text}'"
            ))
        })
}
