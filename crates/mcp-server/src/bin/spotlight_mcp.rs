use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    spotlight_mcp::main_entry().await
}
