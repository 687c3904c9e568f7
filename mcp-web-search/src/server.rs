use crate::ServerConfig;
use crate::tools::{
    self,
    fetch_url::{FetchUrlRequest, PageFetcher},
    web_search::{GoogleCseProvider, WebSearchProvider, WebSearchRequest},
};
use anyhow::Result;
use mcp_web_limiter::RateLimiter;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::stdio,
};
use std::sync::Arc;
use tracing::info;

/// MCP server exposing web search and page fetching
#[derive(Clone)]
pub struct WebMcpServer {
    config: ServerConfig,
    search: Arc<dyn WebSearchProvider>,
    fetcher: Arc<PageFetcher>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WebMcpServer {
    /// Create a server whose tools share `limiter`
    pub fn new(config: ServerConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        info!(
            "Initializing web MCP server: rate={}/s, burst={}",
            config.limiter.rate_per_sec, config.limiter.burst
        );

        let search = GoogleCseProvider::new(config.search.clone(), Arc::clone(&limiter))?;
        let fetcher = PageFetcher::new(config.fetch.clone(), limiter)?;

        Ok(Self {
            config,
            search: Arc::new(search),
            fetcher: Arc::new(fetcher),
            tool_router: Self::tool_router(),
        })
    }

    /// Web search tool - Google Custom Search results
    #[tool(description = "Search the web with Google Custom Search and return title, link and snippet for each result")]
    async fn web_search(
        &self,
        Parameters(request): Parameters<WebSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let response =
            tools::web_search::web_search(self.search.as_ref(), &self.config.search, request).await;
        Ok(CallToolResult::success(vec![Content::json(response)?]))
    }

    /// Fetch tool - page title and cleaned text
    #[tool(description = "Fetch a URL and return its title and cleaned plain text")]
    async fn fetch_url(
        &self,
        Parameters(request): Parameters<FetchUrlRequest>,
    ) -> Result<CallToolResult, McpError> {
        let response = tools::fetch_url::fetch_url(&self.fetcher, request).await;
        Ok(CallToolResult::success(vec![Content::json(response)?]))
    }

    /// Serve the MCP server using stdio transport
    pub async fn serve_stdio(&self) -> Result<()> {
        info!("Starting MCP server with stdio transport");

        let server = self.clone().serve(stdio()).await?;
        let quit_reason = server.waiting().await?;

        info!("MCP server quit: {:?}", quit_reason);
        Ok(())
    }
}

#[tool_handler]
impl ServerHandler for WebMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Web MCP Server - search the web and fetch page text. \
                 Outbound requests are rate limited."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
