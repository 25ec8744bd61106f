//! The remote targeting idea service.
//!
//! [`TargetingIdeaService`] is the seam the fetcher calls through. With the
//! `http` feature enabled, [`HttpTargetingIdeaService`] talks to a JSON
//! endpoint over reqwest.

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::model::{TargetingIdeaPage, TargetingIdeaSelector};

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{classify_status, HttpTargetingIdeaService};

/// Protocol for querying targeting ideas.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TargetingIdeaService: Send + Sync {
    /// Returns the page of ideas selected by `selector`.
    async fn get(&self, selector: &TargetingIdeaSelector) -> Result<TargetingIdeaPage, ServiceError>;
}
