//! Paged seed keyword fetching.
//!
//! This module provides:
//! - The selector factory seam that decides what is queried
//! - The paging loop collecting keyword estimates from every result page
//! - Per-fetch statistics

mod factory;
mod paged;
mod stats;

pub use factory::{SelectorFactory, StaticSelector};
pub use paged::{PagedKeywordFetcher, PAGE_SIZE};
pub use stats::{FetchStats, KeywordEstimates, KeywordFetch};
