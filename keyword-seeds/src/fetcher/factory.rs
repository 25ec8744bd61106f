//! Selector factories.

use crate::model::TargetingIdeaSelector;

/// Produces the selector a fetch starts from.
///
/// Called once per fetch. The fetcher owns the returned selector and only
/// changes its paging window.
pub trait SelectorFactory: Send + Sync {
    /// Creates a fresh selector.
    fn selector(&self) -> TargetingIdeaSelector;
}

impl<F> SelectorFactory for F
where
    F: Fn() -> TargetingIdeaSelector + Send + Sync,
{
    fn selector(&self) -> TargetingIdeaSelector {
        self()
    }
}

/// Factory handing out copies of a prepared selector.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticSelector(pub TargetingIdeaSelector);

impl SelectorFactory for StaticSelector {
    fn selector(&self) -> TargetingIdeaSelector {
        self.0.clone()
    }
}
