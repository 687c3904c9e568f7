//! Configuration for the rate limiter

use crate::error::{LimiterError, Result};
use serde::{Deserialize, Serialize};

/// Default sustained rate, in requests per second.
pub const DEFAULT_RATE_PER_SEC: f64 = 1.0;

/// Default bucket capacity.
pub const DEFAULT_BURST: u32 = 5;

/// Rate and burst settings for a [`RateLimiter`](crate::RateLimiter).
///
/// `rate_per_sec` may be zero: the bucket then never refills and, once the
/// burst is spent, every `acquire` returns immediately with no tokens left.
/// That degenerate mode is accepted so a misconfigured rate degrades to
/// "unthrottled after the burst" instead of hanging every caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimiterConfig {
    /// Tokens replenished per second
    pub rate_per_sec: f64,
    /// Maximum number of requests admitted back-to-back
    pub burst: u32,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            rate_per_sec: DEFAULT_RATE_PER_SEC,
            burst: DEFAULT_BURST,
        }
    }
}

impl LimiterConfig {
    /// Create a configuration from a rate and a burst size.
    pub fn new(rate_per_sec: f64, burst: u32) -> Self {
        Self {
            rate_per_sec,
            burst,
        }
    }

    /// Set the sustained rate (builder style)
    pub fn with_rate(self, rate_per_sec: f64) -> Self {
        Self {
            rate_per_sec,
            ..self
        }
    }

    /// Set the burst size (builder style)
    pub fn with_burst(self, burst: u32) -> Self {
        Self { burst, ..self }
    }

    /// Check that the rate is a finite, non-negative number and that the
    /// burst admits at least one request.
    pub fn validate(&self) -> Result<()> {
        if !self.rate_per_sec.is_finite() {
            return Err(LimiterError::invalid_config(format!(
                "rate_per_sec must be a finite number, got {}",
                self.rate_per_sec
            )));
        }
        if self.rate_per_sec < 0.0 {
            return Err(LimiterError::invalid_config(format!(
                "rate_per_sec must not be negative, got {}",
                self.rate_per_sec
            )));
        }
        if self.burst == 0 {
            return Err(LimiterError::invalid_config("burst must be at least 1"));
        }
        Ok(())
    }
}
