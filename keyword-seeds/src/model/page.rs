//! Targeting ideas, result pages and account ids.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::attributes::{Attribute, AttributeType};

/// Account the service is queried on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientCustomerId(pub i64);

impl ClientCustomerId {
    /// Creates a new account id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ClientCustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ClientCustomerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A single idea returned by the service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetingIdea {
    /// Attribute entries as returned on the wire.
    #[serde(default)]
    pub data: Vec<(AttributeType, Attribute)>,
}

impl TargetingIdea {
    /// Creates an idea without attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute_type: AttributeType, value: Attribute) -> Self {
        self.data.push((attribute_type, value));
        self
    }

    /// Indexes the attributes by type. Later entries of the same type win.
    #[must_use]
    pub fn attribute_map(&self) -> HashMap<AttributeType, Attribute> {
        self.data.iter().cloned().collect()
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingIdeaPage {
    /// Ideas on this page. The service may omit the list entirely.
    #[serde(default)]
    pub entries: Option<Vec<TargetingIdea>>,
    /// Total number of ideas across all pages.
    #[serde(default)]
    pub total_num_entries: i32,
}

impl TargetingIdeaPage {
    /// Creates a page.
    #[must_use]
    pub fn new(entries: Vec<TargetingIdea>, total_num_entries: i32) -> Self {
        Self {
            entries: Some(entries),
            total_num_entries,
        }
    }

    /// Creates a page without an entry list.
    #[must_use]
    pub fn without_entries(total_num_entries: i32) -> Self {
        Self {
            entries: None,
            total_num_entries,
        }
    }

    /// Ideas on this page, empty if the list was omitted.
    #[must_use]
    pub fn entries(&self) -> &[TargetingIdea] {
        self.entries.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_map_last_entry_wins() {
        let idea = TargetingIdea::new()
            .with_attribute(AttributeType::SearchVolume, Attribute::Long(Some(1)))
            .with_attribute(AttributeType::KeywordText, Attribute::String("hats".to_string()))
            .with_attribute(AttributeType::SearchVolume, Attribute::Long(Some(2)));

        let map = idea.attribute_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&AttributeType::SearchVolume], Attribute::Long(Some(2)));
    }

    #[test]
    fn test_page_without_entries() {
        let page = TargetingIdeaPage::without_entries(42);
        assert!(page.entries().is_empty());
        assert_eq!(page.total_num_entries, 42);
    }

    #[test]
    fn test_page_deserializes_missing_entries() {
        let page: TargetingIdeaPage =
            serde_json::from_str(r#"{"totalNumEntries": 0}"#).unwrap();
        assert!(page.entries.is_none());
        assert_eq!(page.total_num_entries, 0);
    }

    #[test]
    fn test_client_customer_id_display() {
        assert_eq!(ClientCustomerId::new(1_234_567_890).to_string(), "1234567890");
    }
}
