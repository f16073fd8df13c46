//! In-memory store used by the service tests and the HTTP tests.
//!
//! Behaves like the SQLite store for everything the services observe:
//! unique category names, restricted category delete, store-assigned ids,
//! and products that always see the current state of their category.
//! Failures can be injected to exercise persistence error paths.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{CategoryStore, ProductStore};
use crate::error::{StoreError, StoreResult};
use crate::pagination::{Page, PageRequest, ProductFilter};
use crate::types::{Category, CategoryId, Product, ProductId};

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<CategoryId, Category>,
    products: BTreeMap<ProductId, Product>,
    last_category_id: CategoryId,
    last_product_id: ProductId,
}

impl Tables {
    /// Replaces the stored copy of the category with the current one.
    fn refresh(&self, mut product: Product) -> Product {
        if let Some(category) = product
            .category
            .id
            .and_then(|id| self.categories.get(&id))
        {
            product.category = category.clone();
        }
        product
    }
}

/// Thread-safe in-memory implementation of both store traits.
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent save/delete fail with [`StoreError::Backend`].
    pub fn fail_writes(&self, enabled: bool) {
        self.fail_writes.store(enabled, Ordering::SeqCst);
    }

    /// Makes every subsequent lookup fail with [`StoreError::Backend`].
    pub fn fail_reads(&self, enabled: bool) {
        self.fail_reads.store(enabled, Ordering::SeqCst);
    }

    fn check_writes(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        Ok(())
    }

    fn check_reads(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected read failure".to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Categories
// =============================================================================

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        self.check_reads()?;
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Category>> {
        self.check_reads()?;
        let tables = self.tables.read().await;
        Ok(tables.categories.values().cloned().collect())
    }

    async fn save(&self, mut category: Category) -> StoreResult<Category> {
        self.check_writes()?;
        let mut tables = self.tables.write().await;

        let taken = tables
            .categories
            .values()
            .any(|c| c.name == category.name && c.id != category.id);
        if taken {
            return Err(StoreError::Conflict(format!(
                "categories.name = {}",
                category.name
            )));
        }

        let id = match category.id {
            Some(id) if tables.categories.contains_key(&id) => id,
            Some(id) => return Err(StoreError::Missing(format!("categories.id = {id}"))),
            None => {
                tables.last_category_id += 1;
                tables.last_category_id
            }
        };
        category.id = Some(id);
        tables.categories.insert(id, category.clone());

        debug!(id, name = %category.name, "Saved category in memory");
        Ok(category)
    }

    async fn delete(&self, category: &Category) -> StoreResult<()> {
        self.check_writes()?;
        let mut tables = self.tables.write().await;

        let id = category
            .id
            .ok_or_else(|| StoreError::Missing("category without id".to_string()))?;

        if tables.products.values().any(|p| p.category.id == Some(id)) {
            return Err(StoreError::ForeignKey(format!(
                "products reference categories.id = {id}"
            )));
        }
        tables
            .categories
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::Missing(format!("categories.id = {id}")))
    }
}

// =============================================================================
// Products
// =============================================================================

#[async_trait]
impl ProductStore for MemoryStore {
    async fn find_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        self.check_reads()?;
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .get(&id)
            .cloned()
            .map(|p| tables.refresh(p)))
    }

    async fn save(&self, mut product: Product) -> StoreResult<Product> {
        self.check_writes()?;
        let mut tables = self.tables.write().await;

        let category_known = product
            .category
            .id
            .is_some_and(|id| tables.categories.contains_key(&id));
        if !category_known {
            return Err(StoreError::ForeignKey(format!(
                "categories.name = {}",
                product.category.name
            )));
        }

        let id = match product.id {
            Some(id) if tables.products.contains_key(&id) => id,
            Some(id) => return Err(StoreError::Missing(format!("products.id = {id}"))),
            None => {
                tables.last_product_id += 1;
                tables.last_product_id
            }
        };
        product.id = Some(id);
        tables.products.insert(id, product.clone());

        debug!(id, name = %product.name, "Saved product in memory");
        Ok(tables.refresh(product))
    }

    async fn delete(&self, product: &Product) -> StoreResult<()> {
        self.check_writes()?;
        let mut tables = self.tables.write().await;

        let id = product
            .id
            .ok_or_else(|| StoreError::Missing("product without id".to_string()))?;
        tables
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::Missing(format!("products.id = {id}")))
    }

    async fn search(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> StoreResult<Page<Product>> {
        self.check_reads()?;
        let tables = self.tables.read().await;

        let mut matching: Vec<Product> = tables
            .products
            .values()
            .cloned()
            .map(|p| tables.refresh(p))
            .filter(|p| filter.matches(p))
            .collect();
        matching.sort_by(|a, b| page.compare(a, b));

        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(page.size() as usize)
            .collect();

        Ok(Page::new(items, total, page.size()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::pagination::{SortDirection, SortField};
    use crate::types::Percentage;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn category(name: &str) -> Category {
        Category::new(name, "desc", Percentage::zero(), Percentage::new(dec!(10)))
    }

    fn product(name: &str, category: &Category) -> Product {
        Product::new(
            name,
            "desc",
            Money::new(dec!(10)),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category.clone(),
        )
    }

    #[tokio::test]
    async fn test_ids_are_assigned() {
        let store = MemoryStore::new();
        let a = CategoryStore::save(&store, category("A")).await.unwrap();
        let b = CategoryStore::save(&store, category("B")).await.unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let store = MemoryStore::new();
        CategoryStore::save(&store, category("A")).await.unwrap();
        let err = CategoryStore::save(&store, category("A")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Different case is a different name
        assert!(CategoryStore::save(&store, category("a")).await.is_ok());
    }

    #[tokio::test]
    async fn test_referenced_category_cannot_be_deleted() {
        let store = MemoryStore::new();
        let cat = CategoryStore::save(&store, category("A")).await.unwrap();
        let p = ProductStore::save(&store, product("P", &cat)).await.unwrap();

        let err = CategoryStore::delete(&store, &cat).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)));

        ProductStore::delete(&store, &p).await.unwrap();
        CategoryStore::delete(&store, &cat).await.unwrap();
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_product_sees_current_category() {
        let store = MemoryStore::new();
        let mut cat = CategoryStore::save(&store, category("A")).await.unwrap();
        let p = ProductStore::save(&store, product("P", &cat)).await.unwrap();

        cat.description = "changed".to_string();
        CategoryStore::save(&store, cat).await.unwrap();

        let loaded = store.find_by_id(p.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded.category.description, "changed");
    }

    #[tokio::test]
    async fn test_unsaved_category_is_rejected() {
        let store = MemoryStore::new();
        let err = ProductStore::save(&store, product("P", &category("A")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)));
    }

    #[tokio::test]
    async fn test_search_pages() {
        let store = MemoryStore::new();
        let cat = CategoryStore::save(&store, category("A")).await.unwrap();
        for name in ["c", "a", "b"] {
            ProductStore::save(&store, product(name, &cat)).await.unwrap();
        }

        let request = PageRequest::new(1, 2, SortField::Name, SortDirection::Asc).unwrap();
        let page = store.search(&ProductFilter::default(), &request).await.unwrap();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "c");
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        assert!(matches!(
            CategoryStore::save(&store, category("A")).await,
            Err(StoreError::Backend(_))
        ));
        store.fail_writes(false);
        store.fail_reads(true);
        assert!(store.find_all().await.is_err());
    }
}
