use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler};
use std::sync::Arc;

use crate::runtime_env::ServerConfig;
use crate::tools::{catalog, ToolError, ToolResponse, ToolRouter};

/// MCP service exposing the Spotlight tools
#[derive(Clone)]
pub struct SpotlightService {
    router: Arc<ToolRouter>,
}

impl SpotlightService {
    pub fn new(router: ToolRouter) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.build_router())
    }

    /// Run one invocation on a blocking worker; engines do synchronous I/O
    pub async fn call(&self, name: String, arguments: Option<JsonObject>) -> ToolResponse {
        let router = Arc::clone(&self.router);
        let tool = name.clone();
        match tokio::task::spawn_blocking(move || router.call(&name, arguments.as_ref())).await {
            Ok(response) => response,
            Err(err) => {
                log::error!("{tool}: worker failed: {err}");
                ToolResponse::error(&ToolError::QueryFailed(format!("worker failed: {err}")))
            }
        }
    }
}

impl ServerHandler for SpotlightService {
    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<CallToolResult, McpError>> + Send + '_
    {
        async move {
            let response = self
                .call(request.name.to_string(), request.arguments)
                .await;
            Ok(response.into_call_tool_result())
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ListToolsResult, McpError>> + Send + '_
    {
        async move { Ok(ListToolsResult::with_all_items(catalog::list_tools())) }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(catalog::tool_instructions()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
