//! Token bucket limiter keyed by account and call bucket.

use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::RateLimitConfig;
use crate::errors::ServiceError;
use crate::model::ClientCustomerId;

/// Admissions between two passes dropping idle accounts from the limiters.
const PRUNE_INTERVAL: u64 = 1024;

type AccountLimiter =
    RateLimiter<ClientCustomerId, DefaultKeyedStateStore<ClientCustomerId>, DefaultClock>;

/// Category of API call a quota applies to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitBucket {
    /// Traffic estimation calls.
    TrafficEstimator,
    /// Every other call, including targeting idea lookups.
    #[default]
    Others,
}

impl RateLimitBucket {
    /// All buckets.
    pub const ALL: [Self; 2] = [Self::TrafficEstimator, Self::Others];

    /// Stable name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TrafficEstimator => "traffic_estimator",
            Self::Others => "others",
        }
    }
}

impl fmt::Display for RateLimitBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters describing limiter activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterStats {
    /// Calls admitted by the token bucket.
    pub admitted_calls: u64,
    /// Calls repeated after a rate exceeded rejection.
    pub rate_exceeded_retries: u64,
}

/// Throttles calls per account and bucket.
///
/// Constructed once and shared by reference (typically in an `Arc`) between
/// every component making calls for the same accounts.
///
/// State is kept per account seen. Accounts whose bucket has fully refilled
/// are dropped every `PRUNE_INTERVAL` admissions, or on [`retain_recent`].
///
/// [`retain_recent`]: AccountRateLimiter::retain_recent
pub struct AccountRateLimiter {
    limiters: HashMap<RateLimitBucket, AccountLimiter>,
    config: RateLimitConfig,
    admitted_calls: AtomicU64,
    rate_exceeded_retries: AtomicU64,
}

impl fmt::Debug for AccountRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRateLimiter")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl AccountRateLimiter {
    /// Creates a limiter from configuration.
    ///
    /// Zero rates fall back to 60 requests per minute, zero bursts to 1.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        let limiters = RateLimitBucket::ALL
            .into_iter()
            .map(|bucket| {
                let quota = Quota::per_minute(non_zero_or(config.bucket_rate(bucket), 60))
                    .allow_burst(non_zero_or(config.burst_size, 1));
                (bucket, RateLimiter::keyed(quota))
            })
            .collect();

        Self {
            limiters,
            config,
            admitted_calls: AtomicU64::new(0),
            rate_exceeded_retries: AtomicU64::new(0),
        }
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Returns a snapshot of the activity counters.
    #[must_use]
    pub fn stats(&self) -> RateLimiterStats {
        RateLimiterStats {
            admitted_calls: self.admitted_calls.load(Ordering::Relaxed),
            rate_exceeded_retries: self.rate_exceeded_retries.load(Ordering::Relaxed),
        }
    }

    /// Number of (account, bucket) pairs currently tracked.
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.limiters.values().map(AccountLimiter::len).sum()
    }

    /// Drops accounts whose buckets are indistinguishable from fresh ones.
    pub fn retain_recent(&self) {
        for limiter in self.limiters.values() {
            limiter.retain_recent();
        }
    }

    /// Runs `call` once the bucket admits it for `account`.
    ///
    /// A [`ServiceError::RateExceeded`] result is retried, after waiting for the
    /// longer of the service's retry hint and the configured backoff, up to
    /// `max_rate_exceeded_retries` times. Every other result is returned as is.
    pub async fn run<T, F, Fut>(
        &self,
        account: ClientCustomerId,
        bucket: RateLimitBucket,
        mut call: F,
    ) -> Result<T, ServiceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let limiter = &self.limiters[&bucket];
        let mut attempt = 0u32;

        loop {
            limiter.until_key_ready(&account).await;
            let admitted = self.admitted_calls.fetch_add(1, Ordering::Relaxed) + 1;
            if admitted % PRUNE_INTERVAL == 0 {
                self.retain_recent();
            }

            match call().await {
                Err(err)
                    if err.is_rate_exceeded() && attempt < self.config.max_rate_exceeded_retries =>
                {
                    attempt += 1;
                    let wait = self.retry_wait(&err, attempt);
                    tracing::warn!(
                        %account,
                        %bucket,
                        attempt,
                        wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Rate exceeded, retrying"
                    );
                    self.rate_exceeded_retries.fetch_add(1, Ordering::Relaxed);
                    tokio::time::sleep(wait).await;
                }
                result => return result,
            }
        }
    }

    fn retry_wait(&self, err: &ServiceError, attempt: u32) -> Duration {
        let backoff = self.config.jitter.apply(self.config.backoff.delay(attempt));
        match err {
            ServiceError::RateExceeded { retry_after, .. } => backoff.max(*retry_after),
            _ => backoff,
        }
    }
}

fn non_zero_or(value: u32, fallback: u32) -> NonZeroU32 {
    NonZeroU32::new(value)
        .or_else(|| NonZeroU32::new(fallback))
        .unwrap_or(NonZeroU32::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::{BackoffStrategy, JitterStrategy};
    use parking_lot::Mutex;
    use std::time::Instant;

    fn fast_config(max_retries: u32) -> RateLimitConfig {
        RateLimitConfig::default()
            .with_requests_per_minute(60_000)
            .with_burst_size(1_000)
            .with_max_rate_exceeded_retries(max_retries)
            .with_backoff(BackoffStrategy::Constant { delay_ms: 0 }, JitterStrategy::None)
    }

    #[tokio::test]
    async fn test_run_returns_success() {
        let limiter = AccountRateLimiter::new(fast_config(3));

        let result = limiter
            .run(ClientCustomerId::new(1), RateLimitBucket::Others, || async {
                Ok::<_, ServiceError>(7)
            })
            .await;

        assert_eq!(result, Ok(7));
        assert_eq!(limiter.stats().admitted_calls, 1);
    }

    #[tokio::test]
    async fn test_rate_exceeded_is_retried() {
        let limiter = AccountRateLimiter::new(fast_config(3));
        let calls = Mutex::new(0u32);

        let result = limiter
            .run(ClientCustomerId::new(1), RateLimitBucket::Others, || {
                let n = {
                    let mut calls = calls.lock();
                    *calls += 1;
                    *calls
                };
                async move {
                    if n < 3 {
                        Err(ServiceError::rate_exceeded(Duration::ZERO, "slow down"))
                    } else {
                        Ok("page")
                    }
                }
            })
            .await;

        assert_eq!(result, Ok("page"));
        assert_eq!(*calls.lock(), 3);
        assert_eq!(
            limiter.stats(),
            RateLimiterStats {
                admitted_calls: 3,
                rate_exceeded_retries: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_rate_exceeded_gives_up_after_max_retries() {
        let limiter = AccountRateLimiter::new(fast_config(2));
        let calls = Mutex::new(0u32);

        let result: Result<(), _> = limiter
            .run(ClientCustomerId::new(1), RateLimitBucket::Others, || {
                *calls.lock() += 1;
                async { Err(ServiceError::rate_exceeded(Duration::ZERO, "still busy")) }
            })
            .await;

        assert!(matches!(result, Err(ServiceError::RateExceeded { .. })));
        assert_eq!(*calls.lock(), 3);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let limiter = AccountRateLimiter::new(fast_config(5));

        for error in [ServiceError::api("bad request"), ServiceError::transport("reset")] {
            let calls = Mutex::new(0u32);
            let expected = error.clone();

            let result: Result<(), _> = limiter
                .run(ClientCustomerId::new(9), RateLimitBucket::Others, || {
                    *calls.lock() += 1;
                    let error = error.clone();
                    async move { Err(error) }
                })
                .await;

            assert_eq!(result, Err(expected));
            assert_eq!(*calls.lock(), 1);
        }
        assert_eq!(limiter.stats().rate_exceeded_retries, 0);
    }

    #[test]
    fn test_retry_wait_honours_service_hint() {
        let limiter = AccountRateLimiter::new(
            fast_config(1).with_backoff(BackoffStrategy::Constant { delay_ms: 10 }, JitterStrategy::None),
        );

        let long_hint = ServiceError::rate_exceeded(Duration::from_secs(2), "wait");
        assert_eq!(limiter.retry_wait(&long_hint, 1), Duration::from_secs(2));

        let short_hint = ServiceError::rate_exceeded(Duration::from_millis(1), "wait");
        assert_eq!(limiter.retry_wait(&short_hint, 1), Duration::from_millis(10));
    }

    #[test]
    fn test_zero_rate_falls_back() {
        assert_eq!(non_zero_or(0, 60).get(), 60);
        assert_eq!(non_zero_or(0, 0).get(), 1);
        assert_eq!(non_zero_or(5, 60).get(), 5);

        let limiter = AccountRateLimiter::new(RateLimitConfig::default().with_requests_per_minute(0));
        tokio_test::block_on(async {
            let result = limiter
                .run(ClientCustomerId::new(3), RateLimitBucket::TrafficEstimator, || async {
                    Ok::<_, ServiceError>(())
                })
                .await;
            assert!(result.is_ok());
        });
    }

    #[test]
    fn test_bucket_names() {
        assert_eq!(RateLimitBucket::Others.to_string(), "others");
        assert_eq!(
            serde_json::to_value(RateLimitBucket::TrafficEstimator).unwrap(),
            "traffic_estimator"
        );
    }

    async fn admit(limiter: &AccountRateLimiter, account: i64, bucket: RateLimitBucket) {
        limiter
            .run(ClientCustomerId::new(account), bucket, || async { Ok::<_, ServiceError>(()) })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_throttles_each_account_separately() {
        let limiter = AccountRateLimiter::new(
            RateLimitConfig::default().with_requests_per_minute(60).with_burst_size(1),
        );

        let started = Instant::now();
        admit(&limiter, 1, RateLimitBucket::Others).await;
        admit(&limiter, 1, RateLimitBucket::Others).await;
        let same_account = started.elapsed();

        let started = Instant::now();
        admit(&limiter, 2, RateLimitBucket::Others).await;
        let other_account = started.elapsed();

        assert!(same_account >= Duration::from_millis(900), "waited {same_account:?}");
        assert!(other_account < Duration::from_millis(200), "waited {other_account:?}");
    }

    #[tokio::test]
    async fn test_buckets_have_separate_quotas() {
        let limiter = AccountRateLimiter::new(
            RateLimitConfig::default().with_requests_per_minute(1).with_burst_size(1),
        );
        admit(&limiter, 5, RateLimitBucket::Others).await;

        let blocked = tokio::time::timeout(
            Duration::from_millis(100),
            admit(&limiter, 5, RateLimitBucket::Others),
        )
        .await;
        assert!(blocked.is_err());

        let started = Instant::now();
        admit(&limiter, 5, RateLimitBucket::TrafficEstimator).await;
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_retain_recent_drops_idle_accounts() {
        let limiter = AccountRateLimiter::new(fast_config(0));
        admit(&limiter, 1, RateLimitBucket::Others).await;
        admit(&limiter, 2, RateLimitBucket::TrafficEstimator).await;
        assert_eq!(limiter.tracked_keys(), 2);

        // 60k rpm refills a token every millisecond.
        tokio::time::sleep(Duration::from_millis(50)).await;
        limiter.retain_recent();

        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[tokio::test]
    async fn test_run_prunes_periodically() {
        let limiter = AccountRateLimiter::new(
            fast_config(0).with_requests_per_minute(6_000_000).with_burst_size(10_000),
        );
        for account in 0..PRUNE_INTERVAL {
            admit(&limiter, i64::try_from(account).unwrap(), RateLimitBucket::Others).await;
        }
        assert!(limiter.tracked_keys() < usize::try_from(PRUNE_INTERVAL).unwrap());
    }
}
