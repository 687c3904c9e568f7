//! Error types for the web tools

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors raised while serving a tool call.
///
/// Tools never surface these to the MCP client as protocol errors: the
/// search tool degrades to an empty result list and the fetch tool reports
/// the message in its `text` field. They exist so the failure can be logged
/// with its cause before it is folded into the response.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Search credentials were not configured
    #[error("GOOGLE_API_KEY and GOOGLE_CSE_ID are required")]
    MissingCredentials,

    /// Building the client, sending the request, a non-success status, or
    /// decoding the body failed
    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
}
