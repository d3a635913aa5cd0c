mod models;
mod schema;
mod song_index;
mod store;
mod trait_def;

pub use models::*;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use song_index::SongIndex;
pub use store::SqliteCatalogStore;
#[cfg(any(test, feature = "mock"))]
pub use trait_def::MockCatalogStore;
pub use trait_def::{CatalogStore, SongLookup};
