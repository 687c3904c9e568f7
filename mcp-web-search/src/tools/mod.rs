//! Tool implementations for the web MCP server
//!
//! Both network tools call the shared rate limiter exactly once per outbound
//! request, immediately before the request is sent.

pub mod fetch_url;
pub mod html_text;
pub mod web_search;
