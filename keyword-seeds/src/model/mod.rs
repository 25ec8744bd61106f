//! Data model for the targeting idea service.
//!
//! This module provides:
//! - The selector sent to the service, including its paging window
//! - Typed idea attributes and their attribute types
//! - Targeting ideas and result pages
//! - The account identifier calls are scoped to

mod attributes;
mod page;
mod selector;

pub use attributes::{Attribute, AttributeType, Money, MonthlySearchVolume};
pub use page::{ClientCustomerId, TargetingIdea, TargetingIdeaPage};
pub use selector::{
    IdeaType, KeywordMatchType, Paging, RequestType, SearchParameter, TargetingIdeaSelector,
};
