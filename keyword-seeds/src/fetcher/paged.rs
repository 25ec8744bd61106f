//! The paging loop over the targeting idea service.

use std::collections::btree_map::Entry;
use std::sync::Arc;
use uuid::Uuid;

use super::factory::SelectorFactory;
use super::stats::{FetchStats, KeywordEstimates, KeywordFetch};
use crate::config::{DuplicateKeywordPolicy, FetcherConfig, TotalEntriesPolicy};
use crate::errors::{DuplicateKeywordError, KeywordSeedError, QueryError, ServiceError};
use crate::estimate::{to_search_estimate, IdeaEstimate};
use crate::model::{
    Attribute, AttributeType, ClientCustomerId, Paging, TargetingIdeaPage, TargetingIdeaSelector,
};
use crate::observability::{LoggingPageObserver, PageObserver, SpanTimer};
use crate::rate_limit::AccountRateLimiter;
use crate::service::TargetingIdeaService;

/// Number of ideas requested per page.
pub const PAGE_SIZE: i32 = 100;

/// Collects keyword estimates from every page of targeting idea results.
///
/// Each fetch asks the factory for one selector, then requests the windows
/// `[0, 100)`, `[100, 200)`, ... through the rate limiter until the reported
/// total is covered. At least one page is always requested. Any failure aborts
/// the fetch; partial results are never returned.
pub struct PagedKeywordFetcher<F> {
    factory: F,
    client_customer_id: ClientCustomerId,
    service: Arc<dyn TargetingIdeaService>,
    rate_limiter: Arc<AccountRateLimiter>,
    config: FetcherConfig,
    observer: Arc<dyn PageObserver>,
}

impl<F: SelectorFactory> PagedKeywordFetcher<F> {
    /// Creates a fetcher with the default configuration.
    pub fn new(
        factory: F,
        client_customer_id: ClientCustomerId,
        service: Arc<dyn TargetingIdeaService>,
        rate_limiter: Arc<AccountRateLimiter>,
    ) -> Self {
        Self {
            factory,
            client_customer_id,
            service,
            rate_limiter,
            config: FetcherConfig::default(),
            observer: Arc::new(LoggingPageObserver),
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: FetcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the progress observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PageObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Account the fetcher queries for.
    pub fn client_customer_id(&self) -> ClientCustomerId {
        self.client_customer_id
    }

    /// Gets the configuration.
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetches every page and returns keyword text mapped to its estimate.
    pub async fn fetch_keywords_and_estimates(&self) -> Result<KeywordEstimates, KeywordSeedError> {
        self.fetch_with_stats().await.map(|fetch| fetch.estimates)
    }

    /// Like [`fetch_keywords_and_estimates`](Self::fetch_keywords_and_estimates),
    /// also returning statistics about the fetch.
    pub async fn fetch_with_stats(&self) -> Result<KeywordFetch, KeywordSeedError> {
        let timer = SpanTimer::start("keyword_fetch");
        let run_id = Uuid::new_v4();
        let mut stats =
            FetchStats::new(run_id, self.client_customer_id).with_bucket(self.config.bucket);
        let mut estimates = KeywordEstimates::new();
        let mut selector = self.factory.selector();
        let mut first_total: Option<i32> = None;
        let mut offset = 0i32;

        self.observer.on_fetch_start(run_id, self.client_customer_id);

        loop {
            let paging = Paging::new(offset, PAGE_SIZE);
            selector.set_paging(paging);

            let page_timer = SpanTimer::start("targeting_idea_page");
            let page = self
                .fetch_page(&selector)
                .await
                .map_err(|e| self.abort(run_id, paging, QueryError::from(e).into()))?;
            stats.pages_fetched += 1;
            self.observer.on_page_received(
                run_id,
                paging,
                page.entries().len(),
                page.total_num_entries,
                page_timer.finish(),
            );

            self.collect_page(&page, offset, &mut estimates, &mut stats)
                .map_err(|e| self.abort(run_id, paging, e))?;

            let total = match self.config.total_entries_policy {
                TotalEntriesPolicy::Latest => page.total_num_entries,
                TotalEntriesPolicy::PinnedToFirst => {
                    *first_total.get_or_insert(page.total_num_entries)
                }
            };
            stats.total_num_entries = total;

            match offset.checked_add(PAGE_SIZE) {
                Some(next) if next < total => offset = next,
                _ => break,
            }
        }

        stats.keywords = estimates.len();
        stats.duration_ms = timer.finish();
        self.observer.on_fetch_complete(&stats);

        Ok(KeywordFetch { estimates, stats })
    }

    async fn fetch_page(
        &self,
        selector: &TargetingIdeaSelector,
    ) -> Result<TargetingIdeaPage, ServiceError> {
        let service = self.service.as_ref();
        self.rate_limiter
            .run(self.client_customer_id, self.config.bucket, move || {
                service.get(selector)
            })
            .await
    }

    fn collect_page(
        &self,
        page: &TargetingIdeaPage,
        offset: i32,
        estimates: &mut KeywordEstimates,
        stats: &mut FetchStats,
    ) -> Result<(), KeywordSeedError> {
        for idea in page.entries() {
            stats.entries_seen += 1;

            let attributes = idea.attribute_map();
            let keyword = attributes
                .get(&AttributeType::KeywordText)
                .and_then(Attribute::as_str)
                .ok_or_else(|| {
                    KeywordSeedError::malformed_idea(offset, "missing keyword text attribute")
                })?;

            self.insert(estimates, keyword, to_search_estimate(&attributes), offset, stats)?;
        }
        Ok(())
    }

    fn insert(
        &self,
        estimates: &mut KeywordEstimates,
        keyword: &str,
        estimate: IdeaEstimate,
        offset: i32,
        stats: &mut FetchStats,
    ) -> Result<(), KeywordSeedError> {
        match estimates.entry(keyword.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(estimate);
            }
            Entry::Occupied(mut slot) => {
                stats.duplicates += 1;
                match self.config.duplicate_policy {
                    DuplicateKeywordPolicy::Reject => {
                        return Err(DuplicateKeywordError::new(keyword, offset).into());
                    }
                    DuplicateKeywordPolicy::KeepFirst => {}
                    DuplicateKeywordPolicy::Overwrite => {
                        slot.insert(estimate);
                    }
                }
            }
        }
        Ok(())
    }

    fn abort(&self, run_id: Uuid, paging: Paging, err: KeywordSeedError) -> KeywordSeedError {
        self.observer.on_fetch_error(run_id, paging, &err.to_string());
        err
    }
}
