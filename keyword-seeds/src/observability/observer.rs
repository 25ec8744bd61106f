//! Callbacks for paged fetch progress.

use uuid::Uuid;

use super::spans::FetchSpanAttributes;
use crate::fetcher::FetchStats;
use crate::model::{ClientCustomerId, Paging};

/// Observability callbacks for paged keyword fetches.
pub trait PageObserver: Send + Sync {
    /// Called before the first page is requested.
    fn on_fetch_start(&self, run_id: Uuid, account: ClientCustomerId);

    /// Called after a page was returned by the service.
    fn on_page_received(
        &self,
        run_id: Uuid,
        paging: Paging,
        entries: usize,
        total_num_entries: i32,
        duration_ms: f64,
    );

    /// Called once every page was processed.
    fn on_fetch_complete(&self, stats: &FetchStats);

    /// Called when the fetch is aborted.
    fn on_fetch_error(&self, run_id: Uuid, paging: Paging, error: &str);
}

/// No-op implementation of [`PageObserver`].
#[derive(Debug, Clone, Default)]
pub struct NoOpPageObserver;

impl PageObserver for NoOpPageObserver {
    fn on_fetch_start(&self, _run_id: Uuid, _account: ClientCustomerId) {}
    fn on_page_received(&self, _run_id: Uuid, _paging: Paging, _entries: usize, _total_num_entries: i32, _duration_ms: f64) {}
    fn on_fetch_complete(&self, _stats: &FetchStats) {}
    fn on_fetch_error(&self, _run_id: Uuid, _paging: Paging, _error: &str) {}
}

/// Observer writing progress to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LoggingPageObserver;

impl PageObserver for LoggingPageObserver {
    fn on_fetch_start(&self, run_id: Uuid, account: ClientCustomerId) {
        tracing::debug!(%run_id, %account, "Keyword fetch started");
    }

    fn on_page_received(
        &self,
        run_id: Uuid,
        paging: Paging,
        entries: usize,
        total_num_entries: i32,
        duration_ms: f64,
    ) {
        tracing::debug!(
            %run_id,
            start_index = paging.start_index,
            entries,
            total_num_entries,
            duration_ms,
            "Targeting idea page received"
        );
    }

    fn on_fetch_complete(&self, stats: &FetchStats) {
        let attributes = FetchSpanAttributes::new()
            .with_run_id(stats.run_id.to_string())
            .with_account(stats.client_customer_id)
            .with_bucket(stats.bucket)
            .with_pages_fetched(stats.pages_fetched)
            .to_otel_attributes();
        tracing::info!(
            keywords = stats.keywords,
            duplicates = stats.duplicates,
            duration_ms = stats.duration_ms,
            ?attributes,
            "Keyword fetch completed"
        );
    }

    fn on_fetch_error(&self, run_id: Uuid, paging: Paging, error: &str) {
        let attributes = FetchSpanAttributes::new()
            .with_run_id(run_id.to_string())
            .with_error(error)
            .to_otel_attributes();
        tracing::error!(
            start_index = paging.start_index,
            ?attributes,
            "Keyword fetch failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observers_accept_all_callbacks() {
        let observers: [&dyn PageObserver; 2] = [&NoOpPageObserver, &LoggingPageObserver];
        let run_id = Uuid::new_v4();
        let paging = Paging::new(0, 100);

        for observer in observers {
            observer.on_fetch_start(run_id, ClientCustomerId::new(1));
            observer.on_page_received(run_id, paging, 3, 3, 1.5);
            observer.on_fetch_complete(&FetchStats::new(run_id, ClientCustomerId::new(1)));
            observer.on_fetch_error(run_id, paging, "boom");
        }
        // Should not panic
    }
}
