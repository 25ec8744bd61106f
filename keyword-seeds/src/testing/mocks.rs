//! Test doubles for the targeting idea service and page observers.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::fetcher::FetchStats;
use crate::model::{ClientCustomerId, Paging, TargetingIdeaPage, TargetingIdeaSelector};
use crate::observability::PageObserver;
use crate::rate_limit::RateLimitBucket;
use crate::service::TargetingIdeaService;

/// A service replaying scripted responses in order and recording every selector.
///
/// Calls past the end of the script fail with an API error.
#[derive(Debug, Default)]
pub struct ScriptedIdeaService {
    responses: Mutex<VecDeque<Result<TargetingIdeaPage, ServiceError>>>,
    selectors: Mutex<Vec<TargetingIdeaSelector>>,
}

impl ScriptedIdeaService {
    /// Creates a service with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service answering with the given pages.
    #[must_use]
    pub fn with_pages(pages: Vec<TargetingIdeaPage>) -> Self {
        Self {
            responses: Mutex::new(pages.into_iter().map(Ok).collect()),
            selectors: Mutex::new(Vec::new()),
        }
    }

    /// Appends a page to the script.
    pub fn push_page(&self, page: TargetingIdeaPage) {
        self.responses.lock().push_back(Ok(page));
    }

    /// Appends a failure to the script.
    pub fn push_error(&self, error: ServiceError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.selectors.lock().len()
    }

    /// Returns the selectors received, in call order.
    #[must_use]
    pub fn recorded_selectors(&self) -> Vec<TargetingIdeaSelector> {
        self.selectors.lock().clone()
    }

    /// Returns the paging start index of each call. Calls without paging report -1.
    #[must_use]
    pub fn recorded_offsets(&self) -> Vec<i32> {
        self.selectors
            .lock()
            .iter()
            .map(|s| s.paging.map_or(-1, |p| p.start_index))
            .collect()
    }

    /// Returns the number of scripted responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

#[async_trait]
impl TargetingIdeaService for ScriptedIdeaService {
    async fn get(&self, selector: &TargetingIdeaSelector) -> Result<TargetingIdeaPage, ServiceError> {
        self.selectors.lock().push(selector.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::api("no scripted response left")))
    }
}

/// An event seen by [`RecordingPageObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    /// Fetch started.
    Start {
        /// Fetch run ID.
        run_id: Uuid,
        /// Account queried.
        account: ClientCustomerId,
    },
    /// Page received.
    Page {
        /// Paging start index.
        start_index: i32,
        /// Ideas on the page.
        entries: usize,
        /// Reported total.
        total_num_entries: i32,
    },
    /// Fetch completed.
    Complete {
        /// Distinct keywords collected.
        keywords: usize,
        /// Pages fetched.
        pages_fetched: u32,
        /// Bucket the calls were charged to.
        bucket: RateLimitBucket,
    },
    /// Fetch failed.
    Error {
        /// Paging start index of the failing page.
        start_index: i32,
        /// Error message.
        error: String,
    },
}

/// An observer that records every callback.
#[derive(Debug, Default)]
pub struct RecordingPageObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingPageObserver {
    /// Creates a new recording observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().clone()
    }

    /// Clears recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl PageObserver for RecordingPageObserver {
    fn on_fetch_start(&self, run_id: Uuid, account: ClientCustomerId) {
        self.events.lock().push(ObservedEvent::Start { run_id, account });
    }

    fn on_page_received(
        &self,
        _run_id: Uuid,
        paging: Paging,
        entries: usize,
        total_num_entries: i32,
        _duration_ms: f64,
    ) {
        self.events.lock().push(ObservedEvent::Page {
            start_index: paging.start_index,
            entries,
            total_num_entries,
        });
    }

    fn on_fetch_complete(&self, stats: &FetchStats) {
        self.events.lock().push(ObservedEvent::Complete {
            keywords: stats.keywords,
            pages_fetched: stats.pages_fetched,
            bucket: stats.bucket,
        });
    }

    fn on_fetch_error(&self, _run_id: Uuid, paging: Paging, error: &str) {
        self.events.lock().push(ObservedEvent::Error {
            start_index: paging.start_index,
            error: error.to_string(),
        });
    }
}
