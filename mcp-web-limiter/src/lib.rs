//! # mcp-web-limiter
//!
//! A process-wide token-bucket admission gate for outbound network calls.
//! Every tool that talks to the network calls [`RateLimiter::acquire`] once
//! per request before sending it, so long-run throughput never exceeds the
//! configured rate while short bursts up to the bucket capacity pass through
//! untouched.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mcp_web_limiter::{LimiterConfig, RateLimiter};
//!
//! # async fn example() -> mcp_web_limiter::Result<()> {
//! let limiter = RateLimiter::from_config(&LimiterConfig::default())?;
//!
//! // Suspends only this task when the bucket is empty
//! limiter.acquire().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`limiter`]: the token bucket and its single `acquire` operation
//! - [`clock`]: the injectable time source ([`TokioClock`] in production,
//!   [`ManualClock`] for deterministic tests)
//! - [`config`]: rate and burst settings with validation
//! - [`error`]: error types and result handling
//!
//! ## Contention
//!
//! `acquire` holds the bucket lock for the whole call, including the wait
//! for a missing token. All admission decisions are therefore serialised in
//! arrival order, and the throughput ceiling is exactly `rate` requests per
//! second no matter how many tasks are queued.

pub mod clock;
pub mod config;
pub mod error;
pub mod limiter;

pub use clock::{Clock, ManualClock, TokioClock};
pub use config::LimiterConfig;
pub use error::{LimiterError, Result};
pub use limiter::RateLimiter;
