use futures::future::join_all;
use mcp_web_limiter::{LimiterConfig, ManualClock, RateLimiter};
use proptest::prelude::*;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
enum Step {
    Advance(Duration),
    Acquire { concurrent: usize },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u64..3_000).prop_map(|ms| Step::Advance(Duration::from_millis(ms))),
        (1usize..4).prop_map(|concurrent| Step::Acquire { concurrent }),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("failed to build test runtime")
}

/// Replays `steps` against a fresh limiter and records the token level after
/// every step.
async fn token_trajectory(config: LimiterConfig, steps: &[Step]) -> Vec<f64> {
    let clock = ManualClock::new();
    let limiter = RateLimiter::with_clock(&config, clock.clone()).expect("valid config");
    let mut trajectory = Vec::with_capacity(steps.len());

    for step in steps {
        match step {
            Step::Advance(duration) => clock.advance(*duration),
            Step::Acquire { concurrent } => {
                join_all((0..*concurrent).map(|_| limiter.acquire())).await;
            }
        }
        trajectory.push(limiter.available_tokens().await);
    }

    trajectory
}

proptest! {
    #[test]
    fn tokens_stay_within_bounds(
        rate in 0.0f64..20.0,
        burst in 1u32..10,
        steps in prop::collection::vec(step_strategy(), 1..60),
    ) {
        let config = LimiterConfig::new(rate, burst);
        let trajectory = runtime().block_on(token_trajectory(config, &steps));

        for tokens in trajectory {
            prop_assert!(tokens >= 0.0, "tokens went negative: {}", tokens);
            prop_assert!(tokens <= f64::from(burst), "tokens above capacity: {}", tokens);
        }
    }

    #[test]
    fn identical_inputs_give_identical_trajectories(
        rate in 0.1f64..10.0,
        burst in 1u32..6,
        steps in prop::collection::vec(step_strategy(), 1..40),
    ) {
        let config = LimiterConfig::new(rate, burst);
        let first = runtime().block_on(token_trajectory(config, &steps));
        let second = runtime().block_on(token_trajectory(config, &steps));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn full_bucket_admits_exactly_capacity_without_waiting(
        rate in 0.1f64..50.0,
        burst in 1u32..20,
    ) {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(&LimiterConfig::new(rate, burst), clock.clone())
            .expect("valid config");

        runtime().block_on(async {
            for _ in 0..burst {
                limiter.acquire().await;
            }
        });
        prop_assert_eq!(clock.sleep_count(), 0);

        runtime().block_on(limiter.acquire());
        prop_assert_eq!(clock.sleep_count(), 1);

        let expected = 1.0 / rate;
        let waited = clock.total_slept().as_secs_f64();
        prop_assert!((waited - expected).abs() < 1e-6, "waited {} expected {}", waited, expected);
    }
}

#[tokio::test(start_paused = true)]
async fn steady_state_throughput_matches_rate() {
    let limiter = RateLimiter::new(2.0, 1).unwrap();
    let start = Instant::now();
    let mut admitted = 0;

    while start.elapsed() < Duration::from_secs(5) {
        limiter.acquire().await;
        admitted += 1;
    }

    assert!(
        (9..=11).contains(&admitted),
        "expected about 10 admissions, got {admitted}"
    );
}

#[tokio::test]
async fn zero_rate_fourth_call_returns_immediately() {
    let clock = ManualClock::new();
    let limiter = RateLimiter::with_clock(&LimiterConfig::new(0.0, 3), clock.clone()).unwrap();

    for _ in 0..4 {
        tokio::time::timeout(Duration::from_secs(1), limiter.acquire())
            .await
            .expect("acquire must not hang with a zero rate");
    }

    assert_eq!(clock.sleep_count(), 0);
    assert_eq!(limiter.available_tokens().await, 0.0);
}

#[tokio::test]
async fn n_plus_one_from_full_bucket_causes_exactly_one_wait() {
    const N: u32 = 6;
    let clock = ManualClock::new();
    let limiter = RateLimiter::with_clock(&LimiterConfig::new(3.0, N), clock.clone()).unwrap();

    join_all((0..=N).map(|_| limiter.acquire())).await;

    assert_eq!(clock.sleep_count(), 1);
    let waited = clock.total_slept().as_secs_f64();
    assert!((waited - 1.0 / 3.0).abs() < 1e-6);
}
