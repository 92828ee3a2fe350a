use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    spotlight_cli::main_entry().await
}
