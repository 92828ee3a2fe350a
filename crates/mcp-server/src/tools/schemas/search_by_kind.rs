use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchByKindRequest {
    #[schemars(
        description = "File kind: document, image, video, audio, pdf or code (case-insensitive)"
    )]
    pub kind: String,

    #[schemars(description = "Absolute path of the directory to search under")]
    pub scope: String,

    #[schemars(description = "Maximum number of results (1-1000, default 100)")]
    pub limit: Option<i64>,
}
