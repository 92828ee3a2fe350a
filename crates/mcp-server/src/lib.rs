//! Spotlight MCP Server
//!
//! Exposes the local desktop metadata index to MCP clients.
//!
//! ## Tools
//!
//! - `search` - Files whose content contains a text
//! - `search_by_kind` - Files of a kind (document, image, video, audio, pdf, code)
//! - `recent_files` - Files modified since a date
//! - `get_metadata` - Every attribute of one file
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "spotlight": {
//!       "command": "spotlight-mcp"
//!     }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use rmcp::transport::stdio;
use rmcp::ServiceExt;

pub mod runtime_env;
mod service;
#[cfg(test)]
mod test_support;
pub mod tools;

pub use runtime_env::{EngineKind, ServerConfig};
pub use service::SpotlightService;

pub async fn main_entry() -> Result<()> {
    // stdout carries the protocol
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = ServerConfig::from_env();
    log::info!(
        "Starting Spotlight MCP server (engine: {}, scope policy: {:?})",
        config.engine.as_str(),
        config.scope_policy
    );

    let service = SpotlightService::from_config(&config);
    let server = service
        .serve(stdio())
        .await
        .context("failed to start MCP server on stdio")?;
    server.waiting().await?;

    log::info!("Spotlight MCP server stopped");
    Ok(())
}
