//! Web search tool backed by the Google Custom Search JSON API

use crate::error::{Result, ToolError};
use async_trait::async_trait;
use mcp_web_limiter::{Clock, RateLimiter, TokioClock};
use reqwest::Client;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Google Custom Search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Results per page accepted by the API.
pub const MAX_RESULTS: u32 = 10;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WebSearchRequest {
    #[schemars(description = "Search query")]
    pub query: String,
    #[schemars(description = "Restrict results to this site, e.g. docs.rs")]
    pub site: Option<String>,
    #[schemars(description = "Maximum number of results to return (1 to 10)")]
    pub limit: Option<u32>,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchItem {
    pub title: Option<String>,
    pub link: String,
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchResponse {
    pub results: Vec<SearchItem>,
}

/// Settings for the search backend.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search API endpoint
    pub endpoint: String,
    /// Google API key
    pub api_key: Option<String>,
    /// Programmable Search Engine id
    pub cse_id: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Result count used when the caller gives no limit
    pub default_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            cse_id: None,
            timeout_secs: 10,
            default_limit: 5,
        }
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("cse_id", &self.cse_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("default_limit", &self.default_limit)
            .finish()
    }
}

/// Trait for web search backends
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Search the web, returning at most `limit` items
    async fn search(&self, query: &str, site: Option<&str>, limit: u32)
    -> Result<Vec<SearchItem>>;
}

/// Google Custom Search provider.
///
/// Holds the shared limiter and takes one token per API request.
pub struct GoogleCseProvider<C: Clock = TokioClock> {
    client: Client,
    config: SearchConfig,
    limiter: Arc<RateLimiter<C>>,
}

impl<C: Clock> GoogleCseProvider<C> {
    /// Create a provider whose requests time out after the configured delay.
    pub fn new(config: SearchConfig, limiter: Arc<RateLimiter<C>>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            limiter,
        })
    }
}

#[async_trait]
impl<C: Clock> WebSearchProvider for GoogleCseProvider<C> {
    async fn search(
        &self,
        query: &str,
        site: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SearchItem>> {
        let (Some(api_key), Some(cse_id)) = (&self.config.api_key, &self.config.cse_id) else {
            return Err(ToolError::MissingCredentials);
        };

        let query = scoped_query(query, site);
        let num = clamp_limit(limit);

        self.limiter.acquire().await;
        debug!("Querying {} for '{}' (num={})", self.config.endpoint, query, num);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("key", api_key.as_str()),
                ("cx", cse_id.as_str()),
                ("q", query.as_str()),
                ("num", num.to_string().as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: CseResponse = response.json().await?;
        let items = body
            .items
            .into_iter()
            .filter_map(|item| {
                let link = item.link.filter(|link| !link.is_empty())?;
                Some(SearchItem {
                    title: item.title,
                    link,
                    snippet: item.snippet,
                })
            })
            .collect();

        Ok(items)
    }
}

/// Custom Search JSON response, reduced to the fields we map
#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

/// Prefix the query with a `site:` operator when a site is given.
pub fn scoped_query(query: &str, site: Option<&str>) -> String {
    match site.map(str::trim).filter(|site| !site.is_empty()) {
        Some(site) => format!("site:{site} {query}"),
        None => query.to_string(),
    }
}

/// Clamp a requested result count into the API's accepted range.
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_RESULTS)
}

/// Run the `web_search` tool.
///
/// Failures are logged and turned into an empty result list.
pub async fn web_search(
    provider: &dyn WebSearchProvider,
    config: &SearchConfig,
    request: WebSearchRequest,
) -> WebSearchResponse {
    // Zero means "no preference", like an absent limit
    let limit = request
        .limit
        .filter(|&n| n > 0)
        .unwrap_or(config.default_limit);
    info!(
        "Processing web search: query='{}', site={:?}, limit={}",
        request.query, request.site, limit
    );

    match provider
        .search(&request.query, request.site.as_deref(), limit)
        .await
    {
        Ok(results) => WebSearchResponse { results },
        Err(e) => {
            warn!("Web search failed: {}", e);
            WebSearchResponse {
                results: Vec::new(),
            }
        }
    }
}
