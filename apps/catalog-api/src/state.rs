//! Shared application state.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState (Clone, one per handler call)                                 │
//! │  ├── categories: CategoryService ──► Arc<dyn CategoryStore>             │
//! │  ├── products:   ProductService  ──► Arc<dyn ProductStore>              │
//! │  └── database:   Option<Database>    (health checks only)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use catalog_core::store::memory::MemoryStore;
use catalog_core::store::{CategoryStore, ProductStore};
use catalog_core::{CategoryService, ProductService};
use catalog_db::Database;

#[derive(Clone)]
pub struct AppState {
    pub categories: CategoryService,
    pub products: ProductService,
    database: Option<Database>,
}

impl AppState {
    /// State backed by arbitrary stores. Health checks always pass.
    pub fn with_stores(
        categories: Arc<dyn CategoryStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        AppState {
            categories: CategoryService::new(categories.clone()),
            products: ProductService::new(products, categories),
            database: None,
        }
    }

    /// State backed by the SQLite repositories.
    pub fn from_database(database: Database) -> Self {
        let categories: Arc<dyn CategoryStore> = Arc::new(database.categories());
        let products: Arc<dyn ProductStore> = Arc::new(database.products());
        AppState {
            database: Some(database),
            ..Self::with_stores(categories, products)
        }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::with_memory_store(MemoryStore::new())
    }

    /// State sharing the given in-memory store, so tests can inject failures.
    pub fn with_memory_store(store: MemoryStore) -> Self {
        Self::with_stores(Arc::new(store.clone()), Arc::new(store))
    }

    pub async fn is_healthy(&self) -> bool {
        match &self.database {
            Some(db) => db.health_check().await,
            None => true,
        }
    }
}
