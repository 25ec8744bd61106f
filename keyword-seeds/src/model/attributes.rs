//! Typed attributes carried by targeting ideas.

use serde::{Deserialize, Serialize};

/// Identifies what an attribute on a targeting idea describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeType {
    /// The keyword text.
    KeywordText,
    /// Approximate monthly searches, averaged over twelve months.
    SearchVolume,
    /// Average cost per click.
    AverageCpc,
    /// Relative advertiser competition, 0.0 to 1.0.
    Competition,
    /// Searches per month for the targeted locations and languages.
    TargetedMonthlySearches,
    /// Product and service categories the idea belongs to.
    CategoryProductsAndServices,
    /// Kind of idea.
    IdeaType,
    /// Web page the idea was extracted from.
    ExtractedFromWebpage,
}

impl AttributeType {
    /// Attributes consulted when building a keyword seed.
    pub const SEARCH_ESTIMATE_ATTRIBUTES: [Self; 5] = [
        Self::KeywordText,
        Self::SearchVolume,
        Self::AverageCpc,
        Self::Competition,
        Self::TargetedMonthlySearches,
    ];
}

/// Money amount in micros of the account currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in millionths of the currency unit.
    pub micro_amount: i64,
}

impl Money {
    /// Zero.
    pub const ZERO: Self = Self { micro_amount: 0 };

    /// Creates an amount from micros.
    #[must_use]
    pub const fn from_micros(micro_amount: i64) -> Self {
        Self { micro_amount }
    }

    /// Amount in currency units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_units(&self) -> f64 {
        self.micro_amount as f64 / 1_000_000.0
    }
}

/// Search count for a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthlySearchVolume {
    /// Calendar year.
    pub year: i32,
    /// Month, 1 to 12.
    pub month: u32,
    /// Number of searches, absent if unknown.
    pub count: Option<i64>,
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Attribute {
    /// String value.
    String(String),
    /// Integer value, absent if unknown.
    Long(Option<i64>),
    /// Floating point value, absent if unknown.
    Double(Option<f64>),
    /// Money value, absent if unknown.
    Money(Option<Money>),
    /// Boolean value.
    Boolean(bool),
    /// Set of integer ids.
    IntegerSet(Vec<i32>),
    /// Monthly search volumes.
    MonthlySearchVolumes(Vec<MonthlySearchVolume>),
}

impl Attribute {
    /// Returns the string value, if this is a string attribute.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is a long attribute holding one.
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => *v,
            _ => None,
        }
    }

    /// Returns the floating point value, if this is a double attribute holding one.
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => *v,
            _ => None,
        }
    }

    /// Returns the money value, if this is a money attribute holding one.
    #[must_use]
    pub fn as_money(&self) -> Option<Money> {
        match self {
            Self::Money(v) => *v,
            _ => None,
        }
    }

    /// Returns the monthly volumes, if this is a monthly search volume attribute.
    #[must_use]
    pub fn as_monthly_searches(&self) -> Option<&[MonthlySearchVolume]> {
        match self {
            Self::MonthlySearchVolumes(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors_reject_other_variants() {
        let text = Attribute::String("shoes".to_string());
        assert_eq!(text.as_str(), Some("shoes"));
        assert_eq!(text.as_long(), None);

        assert_eq!(Attribute::Long(Some(12)).as_long(), Some(12));
        assert_eq!(Attribute::Long(None).as_long(), None);
        assert_eq!(Attribute::Double(Some(0.5)).as_double(), Some(0.5));
        assert_eq!(
            Attribute::Money(Some(Money::from_micros(1_500_000))).as_money(),
            Some(Money::from_micros(1_500_000))
        );
        assert!(Attribute::Boolean(true).as_monthly_searches().is_none());
    }

    #[test]
    fn test_money_units() {
        assert!((Money::from_micros(2_250_000).as_units() - 2.25).abs() < f64::EPSILON);
        assert_eq!(Money::ZERO.as_units(), 0.0);
    }

    #[test]
    fn test_attribute_wire_format() {
        let json = serde_json::to_value(Attribute::Long(Some(880))).unwrap();
        assert_eq!(json, serde_json::json!({"type": "long", "value": 880}));

        let parsed: Attribute =
            serde_json::from_value(serde_json::json!({"type": "string", "value": "boots"})).unwrap();
        assert_eq!(parsed, Attribute::String("boots".to_string()));
    }
}
