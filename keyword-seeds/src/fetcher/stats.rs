//! Fetch results and statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::estimate::IdeaEstimate;
use crate::model::ClientCustomerId;
use crate::rate_limit::RateLimitBucket;

/// Keyword text to estimate, ordered by keyword.
pub type KeywordEstimates = BTreeMap<String, IdeaEstimate>;

/// Counters for a single fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchStats {
    /// Unique ID of the fetch.
    pub run_id: Uuid,
    /// Account queried.
    pub client_customer_id: ClientCustomerId,
    /// Rate limit bucket the calls were charged to.
    #[serde(default)]
    pub bucket: RateLimitBucket,
    /// When the fetch started.
    pub started_at: DateTime<Utc>,
    /// Number of service calls that returned a page.
    pub pages_fetched: u32,
    /// Ideas seen across all pages.
    pub entries_seen: u64,
    /// Distinct keywords collected.
    pub keywords: usize,
    /// Ideas whose keyword text had already been seen.
    pub duplicates: u64,
    /// Total that ended paging, per the total entries policy.
    pub total_num_entries: i32,
    /// Wall time in milliseconds.
    pub duration_ms: f64,
}

impl FetchStats {
    /// Creates empty statistics for a fetch starting now.
    #[must_use]
    pub fn new(run_id: Uuid, client_customer_id: ClientCustomerId) -> Self {
        Self {
            run_id,
            client_customer_id,
            bucket: RateLimitBucket::default(),
            started_at: Utc::now(),
            pages_fetched: 0,
            entries_seen: 0,
            keywords: 0,
            duplicates: 0,
            total_num_entries: 0,
            duration_ms: 0.0,
        }
    }

    /// Sets the bucket the calls are charged to.
    #[must_use]
    pub fn with_bucket(mut self, bucket: RateLimitBucket) -> Self {
        self.bucket = bucket;
        self
    }
}

/// Keyword estimates together with the statistics of the fetch producing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordFetch {
    /// Collected estimates.
    pub estimates: KeywordEstimates,
    /// Fetch statistics.
    pub stats: FetchStats,
}

impl KeywordFetch {
    /// Keywords in order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.estimates.keys().map(String::as_str)
    }
}
