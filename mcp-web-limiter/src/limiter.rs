//! Token-bucket rate limiter

use crate::clock::{Clock, TokioClock};
use crate::config::LimiterConfig;
use crate::error::Result;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Mutable half of the bucket, guarded by the limiter's lock.
#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket admission gate shared by every outbound request.
///
/// The bucket starts full with `burst` tokens and refills continuously at
/// `rate_per_sec`. Each [`acquire`](Self::acquire) consumes one token,
/// waiting for the deficit to refill when the bucket is empty.
///
/// The instance is meant to be built once and shared (usually behind an
/// `Arc`) by all callers in the process.
#[derive(Debug)]
pub struct RateLimiter<C: Clock = TokioClock> {
    capacity: f64,
    rate: f64,
    bucket: Mutex<Bucket>,
    clock: C,
}

impl RateLimiter<TokioClock> {
    /// Create a limiter admitting `rate_per_sec` requests per second with
    /// bursts of up to `burst` requests.
    ///
    /// # Errors
    /// [`LimiterError::InvalidConfig`](crate::LimiterError::InvalidConfig) if
    /// the rate is negative or not finite, or if the burst is zero.
    pub fn new(rate_per_sec: f64, burst: u32) -> Result<Self> {
        Self::from_config(&LimiterConfig::new(rate_per_sec, burst))
    }

    /// Create a limiter from a [`LimiterConfig`].
    pub fn from_config(config: &LimiterConfig) -> Result<Self> {
        Self::with_clock(config, TokioClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Create a limiter that reads time from `clock`.
    pub fn with_clock(config: &LimiterConfig, clock: C) -> Result<Self> {
        config.validate()?;

        let capacity = f64::from(config.burst);
        let last_refill = clock.now();
        debug!(
            "Rate limiter created: rate={}/s, burst={}",
            config.rate_per_sec, config.burst
        );

        Ok(Self {
            capacity,
            rate: config.rate_per_sec,
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill,
            }),
            clock,
        })
    }

    /// Maximum number of tokens the bucket holds.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Tokens replenished per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Token level as of the last `acquire`, without refilling.
    pub async fn available_tokens(&self) -> f64 {
        self.bucket.lock().await.tokens
    }

    /// Wait for a token and consume it.
    ///
    /// Only the calling task is suspended. The whole refill/decide/wait
    /// sequence runs under the bucket lock, so concurrent callers are
    /// admitted one at a time in the order they reached the lock, and a
    /// caller that has to wait keeps everyone behind it queued until it is
    /// done. The wait is computed once from the level seen on entry; there is
    /// no re-check after waking.
    ///
    /// With a rate of zero the bucket never refills, and once the burst is
    /// spent this returns immediately with the level pinned at zero.
    pub async fn acquire(&self) {
        let mut bucket = self.bucket.lock().await;

        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(bucket.last_refill);
        bucket.last_refill = bucket.last_refill.max(now);
        bucket.tokens = (bucket.tokens + elapsed.as_secs_f64() * self.rate).min(self.capacity);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            trace!("Token acquired, {:.3} remaining", bucket.tokens);
            return;
        }

        let wait = self.deficit_wait(bucket.tokens);
        if !wait.is_zero() {
            debug!("Rate limit reached, waiting {:?} for next token", wait);
            self.clock.sleep(wait).await;
            // The tokens accrued while asleep are the one being handed out
            bucket.last_refill = bucket.last_refill.max(self.clock.now());
        }
        bucket.tokens = 0.0;
    }

    /// Time until the bucket holds one whole token again.
    fn deficit_wait(&self, tokens: f64) -> Duration {
        if self.rate <= 0.0 {
            return Duration::ZERO;
        }
        let seconds = ((1.0 - tokens) / self.rate).max(0.0);
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }
}
