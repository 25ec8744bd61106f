//! Fixtures for targeting idea tests.

use std::sync::Arc;

use crate::config::RateLimitConfig;
use crate::fetcher::PAGE_SIZE;
use crate::model::{Attribute, AttributeType, Money, TargetingIdea, TargetingIdeaPage};
use crate::rate_limit::{AccountRateLimiter, BackoffStrategy, JitterStrategy};

/// Builds a keyword idea carrying the attributes a search estimate reads.
#[must_use]
pub fn keyword_idea(
    keyword: &str,
    search_volume: i64,
    average_cpc_micros: i64,
    competition: f64,
) -> TargetingIdea {
    TargetingIdea::new()
        .with_attribute(AttributeType::KeywordText, Attribute::String(keyword.to_string()))
        .with_attribute(AttributeType::SearchVolume, Attribute::Long(Some(search_volume)))
        .with_attribute(
            AttributeType::AverageCpc,
            Attribute::Money(Some(Money::from_micros(average_cpc_micros))),
        )
        .with_attribute(AttributeType::Competition, Attribute::Double(Some(competition)))
}

/// Splits `total` ideas named `"{prefix} {i}"` into pages of [`PAGE_SIZE`],
/// each reporting `total`. Zero ideas yield a single empty page.
#[must_use]
pub fn paged_ideas(total: usize, prefix: &str) -> Vec<TargetingIdeaPage> {
    let page_size = PAGE_SIZE.unsigned_abs() as usize;
    let reported = i32::try_from(total).unwrap_or(i32::MAX);
    let page_count = total.div_ceil(page_size).max(1);

    (0..page_count)
        .map(|page| {
            let start = page * page_size;
            let end = total.min(start + page_size);
            let ideas = (start..end)
                .map(|i| {
                    keyword_idea(
                        &format!("{prefix} {i}"),
                        i64::try_from(i).unwrap_or(i64::MAX),
                        10_000,
                        0.5,
                    )
                })
                .collect();
            TargetingIdeaPage::new(ideas, reported)
        })
        .collect()
}

/// A limiter that never throttles and retries rate exceeded errors without waiting.
#[must_use]
pub fn fast_rate_limiter() -> Arc<AccountRateLimiter> {
    Arc::new(AccountRateLimiter::new(
        RateLimitConfig::new()
            .with_requests_per_minute(600_000)
            .with_burst_size(10_000)
            .with_max_rate_exceeded_retries(3)
            .with_backoff(BackoffStrategy::Constant { delay_ms: 0 }, JitterStrategy::None),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_ideas_layout() {
        let pages = paged_ideas(250, "kw");
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].entries().len(), 100);
        assert_eq!(pages[2].entries().len(), 50);
        assert!(pages.iter().all(|p| p.total_num_entries == 250));
    }

    #[test]
    fn test_paged_ideas_empty() {
        let pages = paged_ideas(0, "kw");
        assert_eq!(pages.len(), 1);
        assert!(pages[0].entries().is_empty());
        assert_eq!(pages[0].total_num_entries, 0);
    }

    #[test]
    fn test_keyword_idea_attributes() {
        let idea = keyword_idea("tea", 10, 20, 0.3);
        let map = idea.attribute_map();
        assert_eq!(map[&AttributeType::KeywordText].as_str(), Some("tea"));
        assert_eq!(map[&AttributeType::SearchVolume].as_long(), Some(10));
    }
}
