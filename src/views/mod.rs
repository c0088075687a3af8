use crate::favorites::FavoritesStore;
use crate::filter::{filter_properties, FilterCriteria};
use crate::models::Property;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Catalog subsequence whose ids are favorites, in catalog order.
///
/// Favorites missing from `catalog` are skipped; they stay in the store.
pub fn favorite_properties(catalog: &[Property], favorites: &FavoritesStore) -> Vec<Property> {
    catalog
        .iter()
        .filter(|p| favorites.is_favorite(&p.id))
        .cloned()
        .collect()
}

/// Input that caused a watcher to wake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChange {
    Catalog,
    Criteria,
    Favorites,
}

enum Dependency {
    Criteria(watch::Receiver<FilterCriteria>),
    Favorites(watch::Receiver<u64>),
}

impl Dependency {
    async fn changed(&mut self) -> Result<ViewChange, watch::error::RecvError> {
        match self {
            Dependency::Criteria(rx) => rx.changed().await.map(|_| ViewChange::Criteria),
            Dependency::Favorites(rx) => rx.changed().await.map(|_| ViewChange::Favorites),
        }
    }

    fn has_changed(&self) -> bool {
        match self {
            Dependency::Criteria(rx) => rx.has_changed().unwrap_or(false),
            Dependency::Favorites(rx) => rx.has_changed().unwrap_or(false),
        }
    }
}

/// Wakes when the catalog or the view's second declared input changes
pub struct ViewWatcher {
    catalog: watch::Receiver<Arc<Vec<Property>>>,
    dependency: Dependency,
}

impl ViewWatcher {
    /// Wait for the next relevant change. `None` once the inputs are gone.
    pub async fn changed(&mut self) -> Option<ViewChange> {
        tokio::select! {
            res = self.catalog.changed() => res.ok().map(|_| ViewChange::Catalog),
            res = self.dependency.changed() => res.ok(),
        }
    }

    /// Whether a relevant change is pending without waiting
    pub fn has_changed(&self) -> bool {
        self.catalog.has_changed().unwrap_or(false) || self.dependency.has_changed()
    }
}

/// Composes filtered and favorite views for the presentation layer.
///
/// Nothing is cached; every query recomputes from the latest inputs.
pub struct PropertyViews {
    catalog: watch::Sender<Arc<Vec<Property>>>,
    criteria: watch::Sender<FilterCriteria>,
    favorites: Arc<FavoritesStore>,
}

impl PropertyViews {
    pub fn new(favorites: Arc<FavoritesStore>) -> Self {
        let (catalog, _) = watch::channel(Arc::new(Vec::new()));
        let (criteria, _) = watch::channel(FilterCriteria::default());
        Self {
            catalog,
            criteria,
            favorites,
        }
    }

    /// Swap in a freshly fetched catalog snapshot
    pub fn replace_catalog(&self, catalog: Vec<Property>) {
        debug!("Replacing catalog with {} properties", catalog.len());
        self.catalog.send_replace(Arc::new(catalog));
    }

    /// Update the criteria. Watchers only wake when the value differs.
    pub fn set_criteria(&self, criteria: FilterCriteria) {
        self.criteria.send_if_modified(|current| {
            if *current == criteria {
                false
            } else {
                *current = criteria;
                true
            }
        });
    }

    pub fn catalog(&self) -> Arc<Vec<Property>> {
        self.catalog.borrow().clone()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.criteria.borrow().clone()
    }

    /// Catalog narrowed by the current criteria
    pub fn filtered(&self) -> Vec<Property> {
        let catalog = self.catalog();
        filter_properties(&catalog, &self.criteria.borrow())
    }

    /// Favorited properties present in the current catalog
    pub fn favorite_properties(&self) -> Vec<Property> {
        favorite_properties(&self.catalog(), &self.favorites)
    }

    /// Size of the favorites set, including ids not in the current catalog
    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    pub fn active_filter_count(&self) -> usize {
        self.criteria.borrow().active_filter_count()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.is_favorite(id)
    }

    pub fn toggle_favorite(&self, id: &str) -> bool {
        self.favorites.toggle(id)
    }

    /// Watcher for `favorite_properties` and `favorite_count`
    pub fn watch_favorites(&self) -> ViewWatcher {
        ViewWatcher {
            catalog: self.catalog.subscribe(),
            dependency: Dependency::Favorites(self.favorites.subscribe()),
        }
    }

    /// Watcher for `filtered` and `active_filter_count`
    pub fn watch_filtered(&self) -> ViewWatcher {
        ViewWatcher {
            catalog: self.catalog.subscribe(),
            dependency: Dependency::Criteria(self.criteria.subscribe()),
        }
    }
}
