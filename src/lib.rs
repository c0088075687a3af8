pub mod catalog;
pub mod config;
pub mod favorites;
pub mod filter;
pub mod models;
pub mod views;

pub use catalog::{CatalogError, CatalogQuery, CatalogSource, JsonFileCatalog, SampleCatalog};
pub use config::{Config, ConfigError};
pub use favorites::{FavoritesOptions, FavoritesStore, FileStorage, KeyValueStorage, MemoryStorage};
pub use filter::{filter_properties, matches, FilterCriteria};
pub use models::{ListingType, Price, Property, PropertyType};
pub use views::{favorite_properties, PropertyViews, ViewChange, ViewWatcher};
