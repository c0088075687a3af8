pub mod json;
pub mod sample;
pub mod traits;

pub use json::JsonFileCatalog;
pub use sample::SampleCatalog;
pub use traits::{CatalogError, CatalogQuery, CatalogSource};

use crate::models::Property;
use std::collections::HashSet;
use tracing::warn;

/// Drop repeated ids from one snapshot, keeping the first occurrence.
pub(crate) fn dedupe_by_id(properties: Vec<Property>) -> Vec<Property> {
    let mut seen = HashSet::with_capacity(properties.len());
    properties
        .into_iter()
        .filter(|p| {
            let fresh = seen.insert(p.id.clone());
            if !fresh {
                warn!("Duplicate property id {} in catalog snapshot, keeping first", p.id);
            }
            fresh
        })
        .collect()
}
