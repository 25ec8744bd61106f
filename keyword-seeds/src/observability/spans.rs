//! Span timing and subscriber setup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use crate::model::ClientCustomerId;
use crate::rate_limit::RateLimitBucket;

/// Attributes describing one keyword fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchSpanAttributes {
    /// Fetch run ID.
    pub run_id: Option<String>,
    /// Account queried.
    pub client_customer_id: Option<ClientCustomerId>,
    /// Rate limit bucket charged.
    pub bucket: Option<RateLimitBucket>,
    /// Pages fetched so far.
    pub pages_fetched: Option<u32>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl FetchSpanAttributes {
    /// Creates new fetch span attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the run ID.
    #[must_use]
    pub fn with_run_id(mut self, id: impl Into<String>) -> Self {
        self.run_id = Some(id.into());
        self
    }

    /// Sets the account.
    #[must_use]
    pub fn with_account(mut self, account: ClientCustomerId) -> Self {
        self.client_customer_id = Some(account);
        self
    }

    /// Sets the bucket.
    #[must_use]
    pub fn with_bucket(mut self, bucket: RateLimitBucket) -> Self {
        self.bucket = Some(bucket);
        self
    }

    /// Sets the page count.
    #[must_use]
    pub fn with_pages_fetched(mut self, pages: u32) -> Self {
        self.pages_fetched = Some(pages);
        self
    }

    /// Sets the error.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Converts to flat OpenTelemetry style attributes.
    #[must_use]
    pub fn to_otel_attributes(&self) -> HashMap<String, String> {
        let mut attrs = HashMap::new();

        if let Some(ref v) = self.run_id {
            attrs.insert("fetch.run_id".to_string(), v.clone());
        }
        if let Some(v) = self.client_customer_id {
            attrs.insert("fetch.client_customer_id".to_string(), v.to_string());
        }
        if let Some(v) = self.bucket {
            attrs.insert("fetch.bucket".to_string(), v.to_string());
        }
        if let Some(v) = self.pages_fetched {
            attrs.insert("fetch.pages_fetched".to_string(), v.to_string());
        }
        if let Some(ref v) = self.error {
            attrs.insert("fetch.error".to_string(), v.clone());
        }

        attrs
    }
}

/// Simple span timing helper.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finishes the span and returns the duration.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.elapsed_ms()
    }
}

/// Installs a global fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (e.g. `keyword_seeds=info`).
pub fn init_tracing(default_directive: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
