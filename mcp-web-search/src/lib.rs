//! # mcp-web-search
//!
//! A Model Context Protocol (MCP) server that lets an AI agent search the web
//! and read web pages. Every outbound HTTP request goes through one shared
//! token-bucket limiter from [`mcp_web_limiter`], so the agent cannot exceed
//! the configured request rate however many tool calls it runs in parallel.
//!
//! ## MCP Tools
//!
//! ### `web_search`
//! Query the Google Custom Search JSON API:
//! - Optional `site` restriction (`site:example.com query`)
//! - Result count between 1 and 10
//! - Returns `{ results: [{ title, link, snippet }] }`, empty on any failure
//!
//! ### `fetch_url`
//! Download a page and return its readable text:
//! - Title from the `<title>` element
//! - Scripts, styles and markup removed, whitespace collapsed
//! - Text capped at `max_chars` characters
//! - Failures are reported as `Error: ...` in the `text` field
//!
//! ## Configuration
//!
//! The binary reads its settings from flags or the environment:
//!
//! | Variable              | Default | Meaning                         |
//! |-----------------------|---------|---------------------------------|
//! | `WEB_RPS`             | `1`     | Sustained requests per second   |
//! | `WEB_BURST`           | `5`     | Requests allowed back-to-back   |
//! | `GOOGLE_API_KEY`      |         | Custom Search API key           |
//! | `GOOGLE_CSE_ID`       |         | Programmable Search Engine id   |
//! | `WEB_SEARCH_ENDPOINT` | Google  | Search API endpoint             |
//! | `WEB_SEARCH_TIMEOUT`  | `10`    | Search timeout in seconds       |
//! | `WEB_SEARCH_LIMIT`    | `5`     | Default number of results       |
//! | `WEB_FETCH_TIMEOUT`   | `10`    | Fetch timeout in seconds        |
//! | `WEB_FETCH_MAX_CHARS` | `8000`  | Default text length             |
//!
//! ## Integration with Claude Desktop
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "web": {
//!       "command": "mcp-web-search",
//!       "env": { "GOOGLE_API_KEY": "...", "GOOGLE_CSE_ID": "..." }
//!     }
//!   }
//! }
//! ```

pub mod error;
mod server;
pub mod tools;

pub use error::{Result, ToolError};
pub use server::WebMcpServer;

use mcp_web_limiter::{LimiterConfig, RateLimiter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tools::fetch_url::FetchConfig;
use tools::web_search::SearchConfig;
use tracing::info;

/// Configuration for the web MCP server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Shared outbound rate limit
    pub limiter: LimiterConfig,
    /// Search backend settings
    pub search: SearchConfig,
    /// Page fetch settings
    pub fetch: FetchConfig,
}

/// Run the web MCP server over stdio until the client disconnects.
///
/// Builds the process-wide rate limiter once and hands it to both tools.
///
/// # Errors
/// - Invalid rate limiter settings (negative or non-finite rate, zero burst)
/// - HTTP client construction failures
/// - MCP protocol communication errors
///
/// # Example
/// ```no_run
/// use mcp_web_search::{ServerConfig, run_server};
///
/// # async fn example() -> anyhow::Result<()> {
/// run_server(ServerConfig::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    info!("Starting web MCP server");

    let limiter = Arc::new(RateLimiter::from_config(&config.limiter)?);
    let server = WebMcpServer::new(config, limiter)?;

    info!("Web MCP server initialized, starting stdio transport");
    server.serve_stdio().await
}
