//! Page fetch tool: download a URL and return its readable text

use crate::error::Result;
use crate::tools::html_text::{self, PageText};
use mcp_web_limiter::{Clock, RateLimiter, TokioClock};
use reqwest::Client;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// User agent sent with every page request.
pub const USER_AGENT: &str = concat!("mcp-web-search/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FetchUrlRequest {
    #[schemars(description = "URL of the page to fetch")]
    pub url: String,
    #[schemars(description = "Maximum number of characters of text to return")]
    pub max_chars: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FetchUrlResponse {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

/// Settings for page fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Text length used when the caller gives no limit
    pub max_chars: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_chars: 8000,
        }
    }
}

/// Downloads pages through the shared limiter.
pub struct PageFetcher<C: Clock = TokioClock> {
    client: Client,
    config: FetchConfig,
    limiter: Arc<RateLimiter<C>>,
}

impl<C: Clock> PageFetcher<C> {
    /// Create a fetcher that follows redirects and identifies itself with
    /// [`USER_AGENT`].
    pub fn new(config: FetchConfig, limiter: Arc<RateLimiter<C>>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            config,
            limiter,
        })
    }

    /// Configured default text length.
    pub fn default_max_chars(&self) -> usize {
        self.config.max_chars
    }

    /// Fetch `url` and extract its title and text.
    pub async fn fetch(&self, url: &str, max_chars: usize) -> Result<PageText> {
        self.limiter.acquire().await;
        debug!("Fetching {}", url);

        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        debug!("Fetched {} bytes from {}", html.len(), url);
        Ok(html_text::extract(&html, max_chars))
    }
}

/// Run the `fetch_url` tool.
///
/// Failures are logged and reported in the response text.
pub async fn fetch_url<C: Clock>(
    fetcher: &PageFetcher<C>,
    request: FetchUrlRequest,
) -> FetchUrlResponse {
    let max_chars = request
        .max_chars
        .map(|n| n as usize)
        .unwrap_or_else(|| fetcher.default_max_chars());
    info!("Processing fetch: url='{}', max_chars={}", request.url, max_chars);

    match fetcher.fetch(&request.url, max_chars).await {
        Ok(page) => FetchUrlResponse {
            url: request.url,
            title: page.title,
            text: page.text,
        },
        Err(e) => {
            warn!("Fetch of {} failed: {}", request.url, e);
            FetchUrlResponse {
                text: format!("Error: {e}"),
                url: request.url,
                title: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_web_limiter::{LimiterConfig, ManualClock};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(burst: u32, max_chars: usize) -> (PageFetcher<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let limiter =
            RateLimiter::with_clock(&LimiterConfig::new(1.0, burst), clock.clone()).unwrap();
        let config = FetchConfig {
            max_chars,
            ..Default::default()
        };
        (PageFetcher::new(config, Arc::new(limiter)).unwrap(), clock)
    }

    fn html_page(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/html; charset=utf-8")
            .set_body_string(body)
    }

    #[tokio::test]
    async fn test_fetch_returns_title_and_clean_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(html_page(
                "<html><head><title>Article</title><script>track()</script></head>\
                 <body><h1>Heading</h1>\n<p>Body   text</p></body></html>",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let (fetcher, _clock) = fetcher(5, 8000);
        let url = format!("{}/article", server.uri());
        let response = fetch_url(
            &fetcher,
            FetchUrlRequest {
                url: url.clone(),
                max_chars: None,
            },
        )
        .await;

        assert_eq!(response.url, url);
        assert_eq!(response.title.as_deref(), Some("Article"));
        assert_eq!(response.text, "Article Heading Body text");
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(html_page("<p>moved here</p>"))
            .mount(&server)
            .await;

        let (fetcher, _clock) = fetcher(5, 8000);
        let page = fetcher
            .fetch(&format!("{}/old", server.uri()), 100)
            .await
            .unwrap();
        assert_eq!(page.text, "moved here");
    }

    #[tokio::test]
    async fn test_request_limit_overrides_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(html_page("<p>0123456789</p>"))
            .mount(&server)
            .await;

        let (fetcher, _clock) = fetcher(5, 8);
        let default_limited = fetch_url(
            &fetcher,
            FetchUrlRequest {
                url: server.uri(),
                max_chars: None,
            },
        )
        .await;
        assert_eq!(default_limited.text, "01234567…");

        let request_limited = fetch_url(
            &fetcher,
            FetchUrlRequest {
                url: server.uri(),
                max_chars: Some(3),
            },
        )
        .await;
        assert_eq!(request_limited.text, "012…");
    }

    #[tokio::test]
    async fn test_error_status_reported_in_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (fetcher, _clock) = fetcher(5, 8000);
        let response = fetch_url(
            &fetcher,
            FetchUrlRequest {
                url: format!("{}/missing", server.uri()),
                max_chars: None,
            },
        )
        .await;

        assert!(response.title.is_none());
        assert!(response.text.starts_with("Error: "));
        assert!(response.text.contains("404"));
    }

    #[tokio::test]
    async fn test_invalid_url_reported_in_text() {
        let (fetcher, _clock) = fetcher(5, 8000);
        let response = fetch_url(
            &fetcher,
            FetchUrlRequest {
                url: "not a url".to_string(),
                max_chars: None,
            },
        )
        .await;

        assert_eq!(response.url, "not a url");
        assert!(response.text.starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_each_fetch_takes_one_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(html_page("<p>ok</p>"))
            .expect(2)
            .mount(&server)
            .await;

        let (fetcher, clock) = fetcher(1, 8000);
        fetcher.fetch(&server.uri(), 100).await.unwrap();
        assert_eq!(clock.sleep_count(), 0);

        fetcher.fetch(&server.uri(), 100).await.unwrap();
        assert_eq!(clock.sleep_count(), 1);
    }
}
