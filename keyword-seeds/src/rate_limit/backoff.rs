//! Backoff between rate-exceeded retries.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the wait grows with each retry attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// Same wait every time.
    Constant {
        /// Wait in milliseconds.
        delay_ms: u64,
    },
    /// Wait grows as `delay * attempt`.
    Linear {
        /// Wait per attempt in milliseconds.
        delay_ms: u64,
    },
    /// Wait doubles every attempt, capped at `max_ms`.
    Exponential {
        /// Wait for the first attempt in milliseconds.
        base_ms: u64,
        /// Upper bound in milliseconds.
        max_ms: u64,
    },
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base_ms: 1_000,
            max_ms: 30_000,
        }
    }
}

impl BackoffStrategy {
    /// Calculates the delay for a given attempt, starting at 1.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Self::Constant { delay_ms } => Duration::from_millis(delay_ms),
            Self::Linear { delay_ms } => {
                Duration::from_millis(delay_ms.saturating_mul(u64::from(attempt)))
            }
            Self::Exponential { base_ms, max_ms } => {
                let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
                Duration::from_millis(base_ms.saturating_mul(factor).min(max_ms))
            }
        }
    }
}

/// Randomness added to a backoff delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterStrategy {
    /// No jitter.
    None,
    /// Full jitter: [0, delay].
    Full,
    /// Equal jitter: [delay/2, delay].
    #[default]
    Equal,
}

impl JitterStrategy {
    /// Applies jitter to a delay.
    #[must_use]
    pub fn apply(&self, delay: Duration) -> Duration {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        if millis == 0 {
            return delay;
        }
        let mut rng = rand::thread_rng();

        match self {
            Self::None => delay,
            Self::Full => Duration::from_millis(rng.gen_range(0..=millis)),
            Self::Equal => {
                let half = millis / 2;
                Duration::from_millis(half + rng.gen_range(0..=millis - half))
            }
        }
    }
}
