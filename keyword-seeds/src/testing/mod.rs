//! Testing utilities for keyword fetches.
//!
//! This module provides:
//! - A scripted targeting idea service that records every selector
//! - A recording page observer
//! - Idea and page fixtures

mod fixtures;
mod mocks;

pub use fixtures::{fast_rate_limiter, keyword_idea, paged_ideas};
pub use mocks::{ObservedEvent, RecordingPageObserver, ScriptedIdeaService};
