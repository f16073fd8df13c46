//! # Store Contracts
//!
//! The services reach storage only through these traits.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CategoryService ──► Arc<dyn CategoryStore> ──┬──► MemoryStore (tests)  │
//! │                                               │                         │
//! │  ProductService  ──► Arc<dyn ProductStore>  ──┴──► catalog-db (SQLite)  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! - `save` inserts when `id` is `None` and returns the entity with its new
//!   id; otherwise it overwrites the record with that id.
//! - Name uniqueness is enforced by the store as well ([`StoreError::Conflict`]).
//! - Deleting a category that products still reference fails with
//!   [`StoreError::ForeignKey`].
//! - A loaded product carries the current state of its category.
//!
//! [`StoreError::Conflict`]: crate::error::StoreError::Conflict
//! [`StoreError::ForeignKey`]: crate::error::StoreError::ForeignKey

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::pagination::{Page, PageRequest, ProductFilter};
use crate::types::{Category, Product, ProductId};

/// Persistence for categories, keyed by unique name.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Exact, case-sensitive name lookup.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Category>>;

    /// Every category, in id order.
    async fn find_all(&self) -> StoreResult<Vec<Category>>;

    async fn save(&self, category: Category) -> StoreResult<Category>;

    async fn delete(&self, category: &Category) -> StoreResult<()>;
}

/// Persistence for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_by_id(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// The product's category must already be saved.
    async fn save(&self, product: Product) -> StoreResult<Product>;

    async fn delete(&self, product: &Product) -> StoreResult<()>;

    /// Filtered, sorted page of products plus totals over the whole match set.
    async fn search(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> StoreResult<Page<Product>>;
}
