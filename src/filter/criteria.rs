use crate::models::{ListingType, PropertyType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Search criteria for narrowing a property catalog.
///
/// Every field defaults to "no constraint": empty sets match everything and
/// `None` bounds are ignored. Present bounds are inclusive, and zero is a
/// real bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Free text matched against suburb, state, postcode and title
    pub search: String,
    pub property_types: HashSet<PropertyType>,
    pub listing_types: HashSet<ListingType>,
    pub min_bedrooms: Option<u32>,
    pub max_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub max_bathrooms: Option<u32>,
    /// Minimum representative price
    pub min_price: Option<u64>,
    /// Maximum representative price
    pub max_price: Option<u64>,
    /// Exact, case-sensitive suburb names
    pub suburbs: HashSet<String>,
    /// Exact, case-sensitive state codes
    pub states: HashSet<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower-cased search text, `None` when empty.
    ///
    /// The text is used as typed: surrounding whitespace is part of the term.
    pub fn search_term(&self) -> Option<String> {
        if self.search.is_empty() {
            None
        } else {
            Some(self.search.to_lowercase())
        }
    }

    /// Number of fields that constrain the result.
    ///
    /// Set-valued fields count once no matter how many values they hold;
    /// each present bound counts once.
    pub fn active_filter_count(&self) -> usize {
        let sets = [
            !self.property_types.is_empty(),
            !self.listing_types.is_empty(),
            !self.suburbs.is_empty(),
            !self.states.is_empty(),
        ];
        let bounds = [
            self.min_bedrooms.is_some(),
            self.max_bedrooms.is_some(),
            self.min_bathrooms.is_some(),
            self.max_bathrooms.is_some(),
            self.min_price.is_some(),
            self.max_price.is_some(),
        ];

        usize::from(self.search_term().is_some())
            + sets.iter().filter(|active| **active).count()
            + bounds.iter().filter(|active| **active).count()
    }

    /// True when the criteria are an identity filter
    pub fn is_empty(&self) -> bool {
        self.active_filter_count() == 0
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_property_types(mut self, types: impl IntoIterator<Item = PropertyType>) -> Self {
        self.property_types = types.into_iter().collect();
        self
    }

    pub fn with_listing_types(mut self, types: impl IntoIterator<Item = ListingType>) -> Self {
        self.listing_types = types.into_iter().collect();
        self
    }

    pub fn with_bedrooms(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_bedrooms = min;
        self.max_bedrooms = max;
        self
    }

    pub fn with_bathrooms(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_bathrooms = min;
        self.max_bathrooms = max;
        self
    }

    pub fn with_price(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_suburbs<S: Into<String>>(mut self, suburbs: impl IntoIterator<Item = S>) -> Self {
        self.suburbs = suburbs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_states<S: Into<String>>(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states = states.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_has_no_active_filters() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.active_filter_count(), 0);
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_set_counts_once() {
        let criteria = FilterCriteria::new()
            .with_property_types([PropertyType::House, PropertyType::Apartment])
            .with_bedrooms(Some(2), None);
        assert_eq!(criteria.active_filter_count(), 2);
    }

    #[test]
    fn test_zero_bound_is_active() {
        let criteria = FilterCriteria::new().with_price(Some(0), None);
        assert_eq!(criteria.active_filter_count(), 1);
        assert!(!criteria.is_empty());
    }

    #[test]
    fn test_only_empty_search_is_inactive() {
        let criteria = FilterCriteria::new().with_search("");
        assert_eq!(criteria.search_term(), None);
        assert_eq!(criteria.active_filter_count(), 0);

        let criteria = FilterCriteria::new().with_search("   ");
        assert_eq!(criteria.search_term().as_deref(), Some("   "));
        assert_eq!(criteria.active_filter_count(), 1);

        let criteria = FilterCriteria::new().with_search(" Fitz ");
        assert_eq!(criteria.search_term().as_deref(), Some(" fitz "));
        assert_eq!(criteria.active_filter_count(), 1);
    }

    #[test]
    fn test_every_field_counts() {
        let criteria = FilterCriteria::new()
            .with_search("vic")
            .with_property_types([PropertyType::Land])
            .with_listing_types([ListingType::Sale])
            .with_bedrooms(Some(1), Some(3))
            .with_bathrooms(Some(1), Some(2))
            .with_price(Some(1), Some(2))
            .with_suburbs(["Fitzroy"])
            .with_states(["VIC"]);
        assert_eq!(criteria.active_filter_count(), 11);
    }

    #[test]
    fn test_deserialize_partial_criteria() {
        let criteria: FilterCriteria = serde_json::from_value(json!({
            "propertyTypes": ["house"],
            "minBedrooms": 0
        }))
        .unwrap();
        assert!(criteria.property_types.contains(&PropertyType::House));
        assert_eq!(criteria.min_bedrooms, Some(0));
        assert_eq!(criteria.max_bedrooms, None);
    }
}
