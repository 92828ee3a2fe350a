use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecentFilesRequest {
    #[schemars(description = "Absolute path of the directory to search under")]
    pub scope: String,

    /// Lower bound on the content modification date
    #[schemars(
        description = "ISO-8601 date or date-time; files modified at or after it are returned (default: 7 days ago)"
    )]
    pub since: Option<String>,

    #[schemars(description = "Maximum number of results (1-1000, default 100)")]
    pub limit: Option<i64>,
}
