use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetMetadataRequest {
    #[schemars(description = "Absolute path of an existing file or directory")]
    pub path: String,
}
