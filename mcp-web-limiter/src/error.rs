//! Error types for the rate limiter

/// Result type for limiter construction and configuration.
pub type Result<T> = std::result::Result<T, LimiterError>;

/// Errors raised while building a [`RateLimiter`](crate::RateLimiter).
///
/// Admission itself cannot fail; only a bad configuration is rejected, and it
/// is rejected at construction time rather than clamped to something safe.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LimiterError {
    /// The rate or burst values are outside their valid range
    #[error("Invalid rate limiter configuration: {message}")]
    InvalidConfig { message: String },
}

impl LimiterError {
    /// Create an invalid configuration error with a custom message.
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
