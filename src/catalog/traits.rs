use crate::models::{ListingType, Property};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while obtaining a catalog snapshot
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Which slice of the catalog to fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogQuery {
    #[default]
    All,
    /// Single-record lookup. Yields zero or one property.
    ById(String),
    /// Premium listings only
    Premium,
    /// Listings marked off-market
    OffMarket,
}

impl CatalogQuery {
    /// Narrow a full snapshot down to this query, keeping catalog order.
    pub fn apply(&self, snapshot: Vec<Property>) -> Vec<Property> {
        match self {
            CatalogQuery::All => snapshot,
            CatalogQuery::ById(id) => snapshot
                .into_iter()
                .find(|p| &p.id == id)
                .into_iter()
                .collect(),
            CatalogQuery::Premium => snapshot.into_iter().filter(|p| p.premium).collect(),
            CatalogQuery::OffMarket => snapshot
                .into_iter()
                .filter(|p| p.listing_type == ListingType::Offmarket)
                .collect(),
        }
    }
}

/// Common trait for every source of property listings.
///
/// A source hands back an already-resolved, ordered snapshot. Each call may
/// return a completely different snapshot, so callers replace rather than
/// merge.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the properties matching `query`
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<Property>, CatalogError>;

    /// Get the name of the catalog source
    fn source_name(&self) -> &'static str;
}
