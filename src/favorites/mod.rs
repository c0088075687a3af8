pub mod storage;
pub mod store;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{FavoritesOptions, FavoritesStore, DEFAULT_FAVORITES_KEY};
