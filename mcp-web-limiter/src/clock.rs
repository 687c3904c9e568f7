//! Time sources for the rate limiter
//!
//! The limiter never reads the system clock or sleeps directly; it goes
//! through a [`Clock`]. Production code uses [`TokioClock`], which also
//! honours tokio's paused test time. [`ManualClock`] is a virtual clock whose
//! sleeps complete instantly, so timing logic can be tested without delays.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Monotonic time source and sleep primitive.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current monotonic instant
    fn now(&self) -> Instant;

    /// Suspend the calling task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by `tokio::time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Virtual clock that only moves when told to.
///
/// Clones share the same timeline, so a test can keep one handle while the
/// limiter owns another. `sleep` advances the timeline by the requested
/// duration, records it, and yields once to the scheduler.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<ManualClockInner>,
}

#[derive(Debug)]
struct ManualClockInner {
    origin: Instant,
    offset_nanos: AtomicU64,
    sleep_count: AtomicU64,
    slept_nanos: AtomicU64,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Create a clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ManualClockInner {
                origin: Instant::now(),
                offset_nanos: AtomicU64::new(0),
                sleep_count: AtomicU64::new(0),
                slept_nanos: AtomicU64::new(0),
            }),
        }
    }

    /// Move virtual time forward.
    pub fn advance(&self, duration: Duration) {
        let nanos = saturating_nanos(duration);
        let _ = self
            .inner
            .offset_nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |offset| {
                Some(offset.saturating_add(nanos))
            });
    }

    /// Virtual time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.inner.offset_nanos.load(Ordering::SeqCst))
    }

    /// Number of `sleep` calls made against this clock.
    pub fn sleep_count(&self) -> u64 {
        self.inner.sleep_count.load(Ordering::SeqCst)
    }

    /// Sum of all durations passed to `sleep`.
    pub fn total_slept(&self) -> Duration {
        Duration::from_nanos(self.inner.slept_nanos.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.inner.origin + self.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        self.inner.sleep_count.fetch_add(1, Ordering::SeqCst);
        let nanos = saturating_nanos(duration);
        let _ = self
            .inner
            .slept_nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |total| {
                Some(total.saturating_add(nanos))
            });
        self.advance(duration);
        tokio::task::yield_now().await;
    }
}

fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
