//! Per-account rate limiting for targeting idea calls.
//!
//! This module provides:
//! - A token bucket limiter keyed by account, one per call bucket
//! - Retrying of calls the service rejects as rate exceeded
//! - Backoff and jitter strategies for those retries

mod backoff;
mod limiter;

pub use backoff::{BackoffStrategy, JitterStrategy};
pub use limiter::{AccountRateLimiter, RateLimitBucket, RateLimiterStats};
