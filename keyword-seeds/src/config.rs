//! Configuration types for seed keyword fetching.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::errors::KeywordSeedError;
use crate::model::ClientCustomerId;
use crate::rate_limit::{BackoffStrategy, JitterStrategy, RateLimitBucket};

/// What to do when the service returns a keyword text more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeywordPolicy {
    /// Abort the fetch with an error.
    #[default]
    Reject,
    /// Keep the estimate seen first.
    KeepFirst,
    /// Replace with the estimate seen last.
    Overwrite,
}

/// Which reported total ends the paging loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalEntriesPolicy {
    /// Re-read the total from every page.
    #[default]
    Latest,
    /// Use the total reported by the first page.
    PinnedToFirst,
}

/// Configuration for the paged keyword fetcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Rate limit bucket the lookups are charged to.
    #[serde(default)]
    pub bucket: RateLimitBucket,
    /// Handling of repeated keyword texts.
    #[serde(default)]
    pub duplicate_policy: DuplicateKeywordPolicy,
    /// Handling of the reported total.
    #[serde(default)]
    pub total_entries_policy: TotalEntriesPolicy,
}

impl FetcherConfig {
    /// Creates a new fetcher configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rate limit bucket.
    #[must_use]
    pub fn with_bucket(mut self, bucket: RateLimitBucket) -> Self {
        self.bucket = bucket;
        self
    }

    /// Sets the duplicate keyword policy.
    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicateKeywordPolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Sets the total entries policy.
    #[must_use]
    pub fn with_total_entries_policy(mut self, policy: TotalEntriesPolicy) -> Self {
        self.total_entries_policy = policy;
        self
    }
}

/// Configuration for the account rate limiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per minute allowed per account in each bucket.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
    /// Per-bucket overrides of `requests_per_minute`.
    #[serde(default)]
    pub bucket_requests_per_minute: HashMap<RateLimitBucket, u32>,
    /// Requests that may be made back to back before throttling starts.
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
    /// Retries of calls the service rejects as rate exceeded.
    #[serde(default = "default_max_rate_exceeded_retries")]
    pub max_rate_exceeded_retries: u32,
    /// Backoff between those retries.
    #[serde(default)]
    pub backoff: BackoffStrategy,
    /// Jitter applied to the backoff.
    #[serde(default)]
    pub jitter: JitterStrategy,
}

fn default_requests_per_minute() -> u32 {
    60
}

fn default_burst_size() -> u32 {
    1
}

fn default_max_rate_exceeded_retries() -> u32 {
    3
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            bucket_requests_per_minute: HashMap::new(),
            burst_size: default_burst_size(),
            max_rate_exceeded_retries: default_max_rate_exceeded_retries(),
            backoff: BackoffStrategy::default(),
            jitter: JitterStrategy::default(),
        }
    }
}

impl RateLimitConfig {
    /// Creates a new rate limit configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rate for a bucket, honouring overrides.
    #[must_use]
    pub fn bucket_rate(&self, bucket: RateLimitBucket) -> u32 {
        self.bucket_requests_per_minute
            .get(&bucket)
            .copied()
            .unwrap_or(self.requests_per_minute)
    }

    /// Sets the default rate.
    #[must_use]
    pub fn with_requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = rpm;
        self
    }

    /// Overrides the rate of one bucket.
    #[must_use]
    pub fn with_bucket_rate(mut self, bucket: RateLimitBucket, rpm: u32) -> Self {
        self.bucket_requests_per_minute.insert(bucket, rpm);
        self
    }

    /// Sets the burst size.
    #[must_use]
    pub fn with_burst_size(mut self, burst: u32) -> Self {
        self.burst_size = burst;
        self
    }

    /// Sets the number of rate exceeded retries.
    #[must_use]
    pub fn with_max_rate_exceeded_retries(mut self, retries: u32) -> Self {
        self.max_rate_exceeded_retries = retries;
        self
    }

    /// Sets the backoff and jitter.
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffStrategy, jitter: JitterStrategy) -> Self {
        self.backoff = backoff;
        self.jitter = jitter;
        self
    }
}

/// Configuration for the HTTP targeting idea client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// URL selectors are posted to.
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Developer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_token: Option<String>,
    /// Additional headers to include.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout() -> f64 {
    30.0
}

fn default_user_agent() -> String {
    concat!("keyword-seeds/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ServiceConfig {
    /// Creates a service configuration for an endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            developer_token: None,
            headers: HashMap::new(),
        }
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the developer token.
    #[must_use]
    pub fn with_developer_token(mut self, token: impl Into<String>) -> Self {
        self.developer_token = Some(token.into());
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Gets timeout as Duration. Invalid values fall back to the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_timeout()))
    }
}

/// Combined configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeywordSeedsConfig {
    /// Account to query for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_customer_id: Option<ClientCustomerId>,
    /// Remote service, if an HTTP client should be built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceConfig>,
    /// Rate limiter configuration.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Fetcher configuration.
    #[serde(default)]
    pub fetcher: FetcherConfig,
}

impl KeywordSeedsConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, KeywordSeedError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KeywordSeedError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Self::from_json_str(&content)
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), KeywordSeedError> {
        if let Some(ref service) = self.service {
            if service.endpoint.trim().is_empty() {
                return Err(KeywordSeedError::Config(
                    "service.endpoint must not be empty".to_string(),
                ));
            }
            if !(service.timeout_seconds.is_finite() && service.timeout_seconds > 0.0) {
                return Err(KeywordSeedError::Config(format!(
                    "service.timeout_seconds must be positive, got {}",
                    service.timeout_seconds
                )));
            }
        }
        if self.rate_limit.burst_size == 0 {
            return Err(KeywordSeedError::Config(
                "rate_limit.burst_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_fetcher_config_defaults() {
        let config = FetcherConfig::default();
        assert_eq!(config.bucket, RateLimitBucket::Others);
        assert_eq!(config.duplicate_policy, DuplicateKeywordPolicy::Reject);
        assert_eq!(config.total_entries_policy, TotalEntriesPolicy::Latest);
    }

    #[test]
    fn test_rate_limit_bucket_overrides() {
        let config = RateLimitConfig::new()
            .with_requests_per_minute(120)
            .with_bucket_rate(RateLimitBucket::TrafficEstimator, 10);

        assert_eq!(config.bucket_rate(RateLimitBucket::Others), 120);
        assert_eq!(config.bucket_rate(RateLimitBucket::TrafficEstimator), 10);
    }

    #[test]
    fn test_service_config_builder() {
        let config = ServiceConfig::new("https://ideas.example.com/v1")
            .with_timeout(5.0)
            .with_developer_token("dev-token")
            .with_header("x-trace", "on");

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.developer_token.as_deref(), Some("dev-token"));
        assert_eq!(config.headers.get("x-trace"), Some(&"on".to_string()));
        assert!(config.user_agent.starts_with("keyword-seeds/"));
    }

    #[test]
    fn test_service_config_invalid_timeout_falls_back() {
        let config = ServiceConfig::new("http://x").with_timeout(-1.0);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_json_str_fills_defaults() {
        let config = KeywordSeedsConfig::from_json_str(
            r#"{
                "client_customer_id": 1234567890,
                "fetcher": {"duplicate_policy": "overwrite"},
                "rate_limit": {
                    "requests_per_minute": 30,
                    "bucket_requests_per_minute": {"traffic_estimator": 5},
                    "backoff": {"strategy": "constant", "delay_ms": 500}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.client_customer_id, Some(ClientCustomerId::new(1_234_567_890)));
        assert_eq!(config.fetcher.duplicate_policy, DuplicateKeywordPolicy::Overwrite);
        assert_eq!(config.fetcher.bucket, RateLimitBucket::Others);
        assert_eq!(config.rate_limit.bucket_rate(RateLimitBucket::TrafficEstimator), 5);
        assert_eq!(config.rate_limit.bucket_rate(RateLimitBucket::Others), 30);
        assert_eq!(config.rate_limit.backoff, BackoffStrategy::Constant { delay_ms: 500 });
        assert_eq!(config.rate_limit.max_rate_exceeded_retries, 3);
        assert!(config.service.is_none());
    }

    #[test]
    fn test_validation_rejects_empty_endpoint() {
        let err = KeywordSeedsConfig::from_json_str(r#"{"service": {"endpoint": " "}}"#).unwrap_err();
        assert!(matches!(err, KeywordSeedError::Config(_)));
    }

    #[test]
    fn test_validation_rejects_zero_burst() {
        let err =
            KeywordSeedsConfig::from_json_str(r#"{"rate_limit": {"burst_size": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("burst_size"));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = KeywordSeedsConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, KeywordSeedError::Serialization(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"service": {{"endpoint": "http://localhost:8080/ideas", "timeout_seconds": 2.5}}}}"#
        )
        .unwrap();

        let config = KeywordSeedsConfig::from_file(file.path()).unwrap();
        let service = config.service.unwrap();
        assert_eq!(service.endpoint, "http://localhost:8080/ideas");
        assert_eq!(service.timeout(), Duration::from_millis(2_500));
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let err = KeywordSeedsConfig::from_file("/nonexistent/keyword-seeds.json").unwrap_err();
        assert!(matches!(err, KeywordSeedError::Io(_)));
    }
}
