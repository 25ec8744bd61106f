//! The request descriptor sent to the targeting idea service.

use serde::{Deserialize, Serialize};

use super::attributes::AttributeType;

/// A window into the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// Index of the first requested entry.
    pub start_index: i32,
    /// Maximum number of entries to return.
    pub number_results: i32,
}

impl Paging {
    /// Creates a new paging window.
    #[must_use]
    pub fn new(start_index: i32, number_results: i32) -> Self {
        Self {
            start_index,
            number_results,
        }
    }

    /// Exclusive end of the window.
    #[must_use]
    pub fn end_index(&self) -> i32 {
        self.start_index.saturating_add(self.number_results)
    }
}

/// Kind of idea to request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdeaType {
    /// Keyword ideas.
    #[default]
    Keyword,
    /// Placement ideas.
    Placement,
}

/// Whether to request new ideas or statistics for known ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    /// Ideas related to the search parameters.
    #[default]
    Ideas,
    /// Statistics for the given keywords.
    Stats,
}

/// Keyword match type used when evaluating seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeywordMatchType {
    /// Exact match.
    Exact,
    /// Phrase match.
    Phrase,
    /// Broad match.
    Broad,
}

/// A targeting criterion restricting the returned ideas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchParameter {
    /// Ideas related to the given query terms.
    RelatedToQuery {
        /// Query terms.
        queries: Vec<String>,
    },
    /// Ideas related to the content of the given URLs.
    RelatedToUrl {
        /// Page URLs.
        urls: Vec<String>,
        /// Whether pages below the URLs are considered.
        include_sub_urls: bool,
    },
    /// Ideas for a product and service category.
    CategoryProductsAndServices {
        /// Category id.
        category_id: i32,
    },
    /// Location criteria ids.
    Location {
        /// Location criterion ids.
        location_ids: Vec<i64>,
    },
    /// Language criteria ids.
    Language {
        /// Language criterion ids.
        language_ids: Vec<i64>,
    },
    /// Network settings.
    Network {
        /// Target Google search.
        google_search: bool,
        /// Target search partners.
        search_network: bool,
    },
}

/// Selector for the targeting idea service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingIdeaSelector {
    /// Targeting criteria.
    #[serde(default)]
    pub search_parameters: Vec<SearchParameter>,
    /// Kind of idea requested.
    #[serde(default)]
    pub idea_type: IdeaType,
    /// Ideas or statistics.
    #[serde(default)]
    pub request_type: RequestType,
    /// Attributes to include on each returned idea.
    #[serde(default)]
    pub requested_attribute_types: Vec<AttributeType>,
    /// Match types the seeds will be evaluated with.
    #[serde(default)]
    pub match_types: Vec<KeywordMatchType>,
    /// Locale for localized values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale_code: Option<String>,
    /// Currency for money values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    /// Requested page window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

impl TargetingIdeaSelector {
    /// Creates a keyword idea selector requesting the attributes needed for
    /// keyword text and search estimates.
    #[must_use]
    pub fn keyword_ideas() -> Self {
        Self {
            requested_attribute_types: AttributeType::SEARCH_ESTIMATE_ATTRIBUTES.to_vec(),
            ..Self::default()
        }
    }

    /// Adds a search parameter.
    #[must_use]
    pub fn with_search_parameter(mut self, parameter: SearchParameter) -> Self {
        self.search_parameters.push(parameter);
        self
    }

    /// Sets the request type.
    #[must_use]
    pub fn with_request_type(mut self, request_type: RequestType) -> Self {
        self.request_type = request_type;
        self
    }

    /// Sets the match types.
    #[must_use]
    pub fn with_match_types(mut self, match_types: impl IntoIterator<Item = KeywordMatchType>) -> Self {
        self.match_types = match_types.into_iter().collect();
        self
    }

    /// Sets the locale code.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale_code = Some(locale.into());
        self
    }

    /// Sets the currency code.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency_code = Some(currency.into());
        self
    }

    /// Replaces the paging window.
    pub fn set_paging(&mut self, paging: Paging) {
        self.paging = Some(paging);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_end_index() {
        assert_eq!(Paging::new(200, 100).end_index(), 300);
        assert_eq!(Paging::new(i32::MAX, 100).end_index(), i32::MAX);
    }

    #[test]
    fn test_keyword_ideas_requests_estimate_attributes() {
        let selector = TargetingIdeaSelector::keyword_ideas();
        assert_eq!(selector.idea_type, IdeaType::Keyword);
        assert_eq!(selector.request_type, RequestType::Ideas);
        assert!(selector
            .requested_attribute_types
            .contains(&AttributeType::KeywordText));
        assert!(selector.paging.is_none());
    }

    #[test]
    fn test_selector_serializes_paging_camel_case() {
        let mut selector = TargetingIdeaSelector::keyword_ideas()
            .with_search_parameter(SearchParameter::RelatedToQuery {
                queries: vec!["running shoes".to_string()],
            })
            .with_match_types([KeywordMatchType::Exact, KeywordMatchType::Broad])
            .with_currency("EUR");
        selector.set_paging(Paging::new(100, 100));

        let json = serde_json::to_value(&selector).unwrap();
        assert_eq!(json["paging"]["startIndex"], 100);
        assert_eq!(json["paging"]["numberResults"], 100);
        assert_eq!(json["ideaType"], "KEYWORD");
        assert_eq!(json["searchParameters"][0]["type"], "related_to_query");
        assert_eq!(json["currencyCode"], "EUR");
        assert!(json.get("localeCode").is_none());
    }
}
