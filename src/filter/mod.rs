pub mod criteria;

pub use criteria::FilterCriteria;

use crate::models::Property;
use tracing::debug;

/// Stable filter of `catalog` by `criteria`. Relative order is preserved.
///
/// Every predicate group must accept a property; values within a group are
/// alternatives.
pub fn filter_properties(catalog: &[Property], criteria: &FilterCriteria) -> Vec<Property> {
    let search = criteria.search_term();
    let filtered: Vec<Property> = catalog
        .iter()
        .filter(|p| matches_with_term(p, criteria, search.as_deref()))
        .cloned()
        .collect();

    debug!(
        "Filtered {} properties down to {} ({} active filters)",
        catalog.len(),
        filtered.len(),
        criteria.active_filter_count()
    );

    filtered
}

/// Whether a single property satisfies `criteria`
pub fn matches(property: &Property, criteria: &FilterCriteria) -> bool {
    matches_with_term(property, criteria, criteria.search_term().as_deref())
}

fn matches_with_term(property: &Property, criteria: &FilterCriteria, search: Option<&str>) -> bool {
    matches_search(property, search)
        && (criteria.property_types.is_empty()
            || criteria.property_types.contains(&property.property_type))
        && (criteria.listing_types.is_empty()
            || criteria.listing_types.contains(&property.listing_type))
        && (criteria.suburbs.is_empty() || criteria.suburbs.contains(&property.location.suburb))
        && (criteria.states.is_empty() || criteria.states.contains(&property.location.state))
        && within(
            property.features.bedrooms,
            criteria.min_bedrooms,
            criteria.max_bedrooms,
        )
        && within(
            property.features.bathrooms,
            criteria.min_bathrooms,
            criteria.max_bathrooms,
        )
        && matches_price(property, criteria)
}

fn matches_search(property: &Property, term: Option<&str>) -> bool {
    let Some(term) = term else {
        return true;
    };

    [
        property.location.suburb.as_str(),
        property.location.state.as_str(),
        property.location.postcode.as_str(),
        property.title.as_str(),
    ]
    .iter()
    .any(|field| !field.is_empty() && field.to_lowercase().contains(term))
}

/// Inclusive bound check. A missing value only fails when a bound is set.
fn within(value: Option<u32>, min: Option<u32>, max: Option<u32>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    match value {
        Some(v) => min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m),
        None => false,
    }
}

fn matches_price(property: &Property, criteria: &FilterCriteria) -> bool {
    // Auction and contact-agent listings have no amount to compare
    let Some(amount) = property.price.representative_amount() else {
        return true;
    };
    criteria.min_price.map_or(true, |min| amount >= min)
        && criteria.max_price.map_or(true, |max| amount <= max)
}
