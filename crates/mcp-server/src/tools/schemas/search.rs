use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Free text to look for in file contents
    #[schemars(description = "Text to find in file contents (case- and diacritic-insensitive)")]
    pub query: String,

    /// Directory bounding the search
    #[schemars(description = "Absolute path of the directory to search under")]
    pub scope: String,

    /// Maximum results (default: 100)
    #[schemars(description = "Maximum number of results (1-1000, default 100)")]
    pub limit: Option<i64>,
}
