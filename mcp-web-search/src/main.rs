use anyhow::Result;
use clap::Parser;
use mcp_web_limiter::LimiterConfig;
use mcp_web_limiter::config::{DEFAULT_BURST, DEFAULT_RATE_PER_SEC};
use mcp_web_search::tools::fetch_url::FetchConfig;
use mcp_web_search::tools::web_search::{DEFAULT_ENDPOINT, SearchConfig};
use mcp_web_search::{ServerConfig, run_server};
use tracing_subscriber::EnvFilter;

/// Web search and page fetch tools over the Model Context Protocol.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Sustained outbound requests per second
    #[arg(long, env = "WEB_RPS", default_value_t = DEFAULT_RATE_PER_SEC)]
    rps: f64,

    /// Outbound requests allowed back-to-back
    #[arg(long, env = "WEB_BURST", default_value_t = DEFAULT_BURST)]
    burst: u32,

    /// Google Custom Search API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    google_api_key: Option<String>,

    /// Programmable Search Engine id
    #[arg(long, env = "GOOGLE_CSE_ID")]
    google_cse_id: Option<String>,

    /// Search API endpoint
    #[arg(long, env = "WEB_SEARCH_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    search_endpoint: String,

    /// Search request timeout in seconds
    #[arg(long, env = "WEB_SEARCH_TIMEOUT", default_value_t = 10)]
    search_timeout: u64,

    /// Number of search results when the caller gives no limit
    #[arg(long, env = "WEB_SEARCH_LIMIT", default_value_t = 5)]
    search_limit: u32,

    /// Page fetch timeout in seconds
    #[arg(long, env = "WEB_FETCH_TIMEOUT", default_value_t = 10)]
    fetch_timeout: u64,

    /// Characters of page text returned when the caller gives no limit
    #[arg(long, env = "WEB_FETCH_MAX_CHARS", default_value_t = 8000)]
    fetch_max_chars: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            limiter: LimiterConfig::new(args.rps, args.burst),
            search: SearchConfig {
                endpoint: args.search_endpoint,
                api_key: args.google_api_key,
                cse_id: args.google_cse_id,
                timeout_secs: args.search_timeout,
                default_limit: args.search_limit,
            },
            fetch: FetchConfig {
                timeout_secs: args.fetch_timeout,
                max_chars: args.fetch_max_chars,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Stdout carries the MCP transport, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run_server(args.into()).await
}
