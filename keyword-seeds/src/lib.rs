//! # Keyword Seeds
//!
//! Seed keyword generation from a paged targeting idea service.
//!
//! A [`PagedKeywordFetcher`](fetcher::PagedKeywordFetcher) takes a selector
//! from an injected factory, walks every result page of the service through a
//! per-account rate limiter and returns each distinct keyword text with its
//! search estimate.
//!
//! - **Pluggable queries**: any `Fn() -> TargetingIdeaSelector` decides what is asked
//! - **Explicit rate limiting**: one token bucket per account and call bucket, passed in
//! - **All-or-nothing results**: any remote failure aborts with a single error
//! - **Explicit duplicate handling**: reject, keep first, or overwrite
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keyword_seeds::prelude::*;
//! use std::sync::Arc;
//!
//! let account = ClientCustomerId::new(1234567890);
//! let service = HttpTargetingIdeaService::new(&ServiceConfig::new(endpoint), account)?;
//! let limiter = Arc::new(AccountRateLimiter::new(RateLimitConfig::default()));
//!
//! let fetcher = PagedKeywordFetcher::new(
//!     || TargetingIdeaSelector::keyword_ideas().with_search_parameter(
//!         SearchParameter::RelatedToQuery { queries: vec!["running shoes".into()] },
//!     ),
//!     account,
//!     Arc::new(service),
//!     limiter,
//! );
//!
//! let estimates = fetcher.fetch_keywords_and_estimates().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod errors;
pub mod estimate;
pub mod fetcher;
pub mod model;
pub mod observability;
pub mod rate_limit;
pub mod service;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        DuplicateKeywordPolicy, FetcherConfig, KeywordSeedsConfig, RateLimitConfig,
        ServiceConfig, TotalEntriesPolicy,
    };
    pub use crate::errors::{
        DuplicateKeywordError, KeywordSeedError, QueryError, QueryErrorKind, ServiceError,
    };
    pub use crate::estimate::{to_search_estimate, IdeaEstimate};
    pub use crate::fetcher::{
        FetchStats, KeywordEstimates, KeywordFetch, PagedKeywordFetcher, SelectorFactory,
        StaticSelector, PAGE_SIZE,
    };
    pub use crate::model::{
        Attribute, AttributeType, ClientCustomerId, KeywordMatchType, Money, Paging,
        SearchParameter, TargetingIdea, TargetingIdeaPage, TargetingIdeaSelector,
    };
    pub use crate::observability::{LoggingPageObserver, NoOpPageObserver, PageObserver};
    pub use crate::rate_limit::{AccountRateLimiter, RateLimitBucket};
    #[cfg(feature = "http")]
    pub use crate::service::HttpTargetingIdeaService;
    pub use crate::service::TargetingIdeaService;
}
