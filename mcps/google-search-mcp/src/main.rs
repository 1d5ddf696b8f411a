//! Google Search MCP Server
//!
//! Google Custom Search tools served over stdio.
//!
//! # Usage
//!
//! ```json
//! { "mcpServers": { "google-search": {
//!     "command": "./google-search-mcp",
//!     "env": { "GOOGLE_API_KEY": "...", "GOOGLE_CSE_ID": "..." }
//! } } }
//! ```

use google_search_mcp::{Config, GoogleSearchMcpServer};
use rmcp::{transport::stdio, ServiceExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mcp_common::init_tracing("google_search_mcp")?;

    tracing::info!("Starting Google Search MCP Server");

    let config = Config::load()?;
    tracing::info!("Custom Search endpoint: {}", config.api.base_url);

    let server = GoogleSearchMcpServer::new(config)?;
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
