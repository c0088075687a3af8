use crate::catalog::traits::{CatalogError, CatalogQuery, CatalogSource};
use crate::catalog::dedupe_by_id;
use crate::models::Property;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Catalog backed by a JSON array of properties on disk.
///
/// The file is re-read on every fetch so an updated export replaces the
/// previous snapshot wholesale.
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_snapshot(&self) -> Result<Vec<Property>, CatalogError> {
        debug!("Reading catalog from {}", self.path.display());

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })?;

        // Blank file means nothing listed yet
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let properties: Vec<Property> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!("Parsed {} bytes into {} properties", raw.len(), properties.len());

        Ok(dedupe_by_id(properties))
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<Property>, CatalogError> {
        let snapshot = self.read_snapshot().await?;
        let properties = query.apply(snapshot);
        info!(
            "Loaded {} properties from {} ({:?})",
            properties.len(),
            self.path.display(),
            query
        );
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "JSON file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_catalog(dir: &Path, value: serde_json::Value) -> PathBuf {
        let path = dir.join("catalog.json");
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_order() {
        let dir = tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            json!([
                { "id": "b", "type": "house", "listingType": "sale" },
                { "id": "a", "type": "land", "listingType": "offmarket" },
                { "id": "c", "type": "apartment", "listingType": "rent", "premium": true }
            ]),
        );

        let catalog = JsonFileCatalog::new(path);
        let ids: Vec<String> = catalog
            .fetch(&CatalogQuery::All)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        let off_market = catalog.fetch(&CatalogQuery::OffMarket).await.unwrap();
        assert_eq!(off_market.len(), 1);
        assert_eq!(off_market[0].id, "a");

        let premium = catalog.fetch(&CatalogQuery::Premium).await.unwrap();
        assert_eq!(premium.len(), 1);
        assert_eq!(premium[0].id, "c");
    }

    #[tokio::test]
    async fn test_fetch_by_id() {
        let dir = tempdir().unwrap();
        let path = write_catalog(
            dir.path(),
            json!([{ "id": "a", "type": "house", "listingType": "sale" }]),
        );
        let catalog = JsonFileCatalog::new(path);

        let found = catalog
            .fetch(&CatalogQuery::ById("a".to_string()))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let missing = catalog
            .fetch(&CatalogQuery::ById("zzz".to_string()))
            .await
            .unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_blank_file_is_empty_catalog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "  \n").unwrap();

        let properties = JsonFileCatalog::new(path)
            .fetch(&CatalogQuery::All)
            .await
            .unwrap();
        assert!(properties.is_empty());
    }

    #[tokio::test]
    async fn test_missing_and_malformed_files_error() {
        let dir = tempdir().unwrap();
        let missing = JsonFileCatalog::new(dir.path().join("nope.json"));
        assert!(matches!(
            missing.fetch(&CatalogQuery::All).await,
            Err(CatalogError::Io { .. })
        ));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let malformed = JsonFileCatalog::new(path);
        assert!(matches!(
            malformed.fetch(&CatalogQuery::All).await,
            Err(CatalogError::Parse { .. })
        ));
    }
}
