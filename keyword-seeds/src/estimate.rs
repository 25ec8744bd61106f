//! Search estimates derived from idea attributes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{Attribute, AttributeType, Money, MonthlySearchVolume};

/// Traffic and cost indicators for a candidate keyword.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdeaEstimate {
    /// Relative advertiser competition, 0.0 to 1.0.
    pub competition: f64,
    /// Average monthly searches.
    pub search_volume: f64,
    /// Average cost per click.
    pub average_cpc: Money,
    /// Per-month searches for the targeted locations and languages.
    #[serde(default)]
    pub targeted_monthly_searches: Vec<MonthlySearchVolume>,
}

impl IdeaEstimate {
    /// Creates an estimate without monthly breakdown.
    #[must_use]
    pub fn new(competition: f64, search_volume: f64, average_cpc: Money) -> Self {
        Self {
            competition,
            search_volume,
            average_cpc,
            targeted_monthly_searches: Vec::new(),
        }
    }

    /// Sum of the known monthly search counts.
    #[must_use]
    pub fn total_monthly_searches(&self) -> i64 {
        self.targeted_monthly_searches
            .iter()
            .filter_map(|m| m.count)
            .sum()
    }
}

/// Builds a search estimate from the attributes of a targeting idea.
///
/// Missing or empty numeric attributes are treated as zero.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::implicit_hasher)]
pub fn to_search_estimate(attributes: &HashMap<AttributeType, Attribute>) -> IdeaEstimate {
    let competition = attributes
        .get(&AttributeType::Competition)
        .and_then(Attribute::as_double)
        .unwrap_or(0.0);

    let search_volume = attributes
        .get(&AttributeType::SearchVolume)
        .and_then(Attribute::as_long)
        .map_or(0.0, |v| v as f64);

    let average_cpc = attributes
        .get(&AttributeType::AverageCpc)
        .and_then(Attribute::as_money)
        .unwrap_or(Money::ZERO);

    let targeted_monthly_searches = attributes
        .get(&AttributeType::TargetedMonthlySearches)
        .and_then(Attribute::as_monthly_searches)
        .map(<[MonthlySearchVolume]>::to_vec)
        .unwrap_or_default();

    IdeaEstimate {
        competition,
        search_volume,
        average_cpc,
        targeted_monthly_searches,
    }
}
