//! # Product Repository
//!
//! SQLite implementation of [`ProductStore`].
//!
//! ## Key Operations
//! - CRUD by id, always loading the product together with its category
//! - Paged search with optional case-insensitive substring filters
//!
//! ## Paged Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a Search Page Is Built                           │
//! │                                                                         │
//! │  ProductFilter { name: "caf", category: "bebi" }                       │
//! │  PageRequest   { index: 1, size: 10, sort: precoBase, dir: DESC }      │
//! │       │                                                                 │
//! │       ├──► SELECT COUNT(*) ... WHERE <filters>      → total_elements    │
//! │       │                                                                 │
//! │       └──► SELECT ... WHERE <filters>                                   │
//! │            ORDER BY CAST(p.base_price AS REAL) DESC, p.id ASC          │
//! │            LIMIT 10 OFFSET 10                        → items            │
//! │                                                                         │
//! │  Each filter is `(?n IS NULL OR col_folded LIKE ?n ESCAPE '\')` so an  │
//! │  absent filter matches every row.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Case Folding
//! SQLite's `LOWER` folds ASCII letters only. Names and descriptions are
//! therefore folded in Rust with [`fold_case`] on every write and stored in
//! `*_folded` columns, and filters compare against those.

use std::str::FromStr;

use async_trait::async_trait;
use catalog_core::error::StoreResult;
use catalog_core::pagination::{fold_case, Page, PageRequest, ProductFilter, SortField};
use catalog_core::store::ProductStore;
use catalog_core::{Category, Money, Percentage, Product, ProductId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Columns of a product joined with its category.
const PRODUCT_COLUMNS: &str = r#"
    p.id,
    p.name,
    p.description,
    p.base_price,
    p.registered_on,
    c.id AS category_id,
    c.name AS category_name,
    c.description AS category_description,
    c.tax AS category_tax,
    c.discount AS category_discount
"#;

/// Shared WHERE clause of the search queries. Binds: ?1 name, ?2 description,
/// ?3 category name, each already folded and wrapped in `%`.
const SEARCH_FILTER: &str = r#"
    WHERE (?1 IS NULL OR p.name_folded LIKE ?1 ESCAPE '\')
      AND (?2 IS NULL OR p.description_folded LIKE ?2 ESCAPE '\')
      AND (?3 IS NULL OR c.name_folded LIKE ?3 ESCAPE '\')
"#;

// =============================================================================
// Row Type
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    base_price: String,
    registered_on: NaiveDate,
    category_id: i64,
    category_name: String,
    category_description: String,
    category_tax: String,
    category_discount: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        let category = Category {
            id: Some(row.category_id),
            name: row.category_name,
            description: row.category_description,
            tax: parse_decimal("categories.tax", &row.category_tax).map(Percentage::new)?,
            discount: parse_decimal("categories.discount", &row.category_discount)
                .map(Percentage::new)?,
        };

        Ok(Product {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            base_price: parse_decimal("products.base_price", &row.base_price).map(Money::new)?,
            registered_on: row.registered_on,
            category,
        })
    }
}

fn parse_decimal(column: &'static str, text: &str) -> DbResult<Decimal> {
    Decimal::from_str(text).map_err(|_| DbError::corrupt(column, text))
}

/// ORDER BY expression for a sort field. Prices are compared numerically.
fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Id => "p.id",
        SortField::Name => "p.name",
        SortField::Description => "p.description",
        SortField::BasePrice => "CAST(p.base_price AS REAL)",
        SortField::RegisteredOn => "p.registered_on",
    }
}

/// `%value%` with LIKE wildcards in the value escaped.
fn like_pattern(value: Option<&str>) -> Option<String> {
    value.map(|v| {
        let mut pattern = String::with_capacity(v.len() + 2);
        pattern.push('%');
        for ch in v.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    })
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let product = repo.get_by_id(42).await?;
/// let page = repo.search_page(&filter, &PageRequest::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Loads a product with the current state of its category.
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             INNER JOIN categories c ON c.id = p.category_id \
             WHERE p.id = ?1"
        );

        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Inserts a product and returns its new id.
    ///
    /// ## Errors
    /// [`DbError::ForeignKeyViolation`] when the category id does not exist.
    pub async fn insert(&self, product: &Product) -> DbResult<ProductId> {
        let category_id = category_id(product)?;
        debug!(name = %product.name, category_id, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, name_folded, description, description_folded,
                base_price, registered_on, category_id
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.name)
        .bind(fold_case(&product.name))
        .bind(&product.description)
        .bind(fold_case(&product.description))
        .bind(product.base_price.amount().to_string())
        .bind(product.registered_on)
        .bind(category_id)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites an existing product. The registration date is never changed.
    pub async fn update(&self, id: ProductId, product: &Product) -> DbResult<()> {
        let category_id = category_id(product)?;
        debug!(id, name = %product.name, category_id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                name_folded = ?3,
                description = ?4,
                description_folded = ?5,
                base_price = ?6,
                category_id = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(fold_case(&product.name))
        .bind(&product.description)
        .bind(fold_case(&product.description))
        .bind(product.base_price.amount().to_string())
        .bind(category_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }

    pub async fn remove(&self, id: ProductId) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }

    /// Filtered, sorted page plus the size of the whole match set.
    pub async fn search_page(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> DbResult<Page<Product>> {
        let name = like_pattern(filter.name());
        let description = like_pattern(filter.description());
        let category = like_pattern(filter.category_name());

        debug!(
            ?name,
            ?description,
            ?category,
            index = page.index(),
            size = page.size(),
            sort = page.sort().wire_name(),
            direction = page.direction().as_sql(),
            "Searching products"
        );

        let count_sql = format!(
            "SELECT COUNT(*) FROM products p \
             INNER JOIN categories c ON c.id = p.category_id {SEARCH_FILTER}"
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&name)
            .bind(&description)
            .bind(&category)
            .fetch_one(&self.pool)
            .await?;

        let page_sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             INNER JOIN categories c ON c.id = p.category_id {SEARCH_FILTER} \
             ORDER BY {} {}, p.id ASC \
             LIMIT ?4 OFFSET ?5",
            sort_column(page.sort()),
            page.direction().as_sql(),
        );
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, ProductRow>(&page_sql)
            .bind(&name)
            .bind(&description)
            .bind(&category)
            .bind(i64::from(page.size()))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(Product::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        debug!(total, returned = items.len(), "Search page loaded");
        Ok(Page::new(
            items,
            u64::try_from(total).unwrap_or_default(),
            page.size(),
        ))
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn category_id(product: &Product) -> DbResult<i64> {
    product
        .category
        .id
        .ok_or_else(|| DbError::ForeignKeyViolation {
            message: format!("category '{}' has not been saved", product.category.name),
        })
}

// =============================================================================
// Store Implementation
// =============================================================================

#[async_trait]
impl ProductStore for ProductRepository {
    async fn find_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self.get_by_id(id).await?)
    }

    async fn save(&self, product: Product) -> StoreResult<Product> {
        let id = match product.id {
            Some(id) => {
                self.update(id, &product).await?;
                id
            }
            None => self.insert(&product).await?,
        };

        // Reload so the caller sees the stored category state
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id).into())
    }

    async fn delete(&self, product: &Product) -> StoreResult<()> {
        let id = product
            .id
            .ok_or_else(|| DbError::not_found("Product", &product.name))?;
        Ok(self.remove(id).await?)
    }

    async fn search(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> StoreResult<Page<Product>> {
        Ok(self.search_page(filter, page).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use catalog_core::pagination::SortDirection;
    use catalog_core::store::CategoryStore;
    use catalog_core::StoreError;
    use rust_decimal_macros::dec;

    struct Fixture {
        db: Database,
        bebidas: Category,
        limpeza: Category,
    }

    impl Fixture {
        async fn new() -> Self {
            let db = Database::new(DbConfig::in_memory()).await.unwrap();
            let categories = db.categories();
            let bebidas = categories
                .save(Category::new(
                    "Bebidas",
                    "Bebidas em geral",
                    Percentage::zero(),
                    Percentage::new(dec!(10)),
                ))
                .await
                .unwrap();
            let limpeza = categories
                .save(Category::new(
                    "Limpeza",
                    "Produtos de limpeza",
                    Percentage::new(dec!(5)),
                    Percentage::zero(),
                ))
                .await
                .unwrap();
            Fixture {
                db,
                bebidas,
                limpeza,
            }
        }

        fn repo(&self) -> ProductRepository {
            self.db.products()
        }

        async fn add(
            &self,
            name: &str,
            description: &str,
            cents: i64,
            category: &Category,
        ) -> Product {
            let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
            self.repo()
                .save(Product::new(
                    name,
                    description,
                    Money::from_cents(cents),
                    date,
                    category.clone(),
                ))
                .await
                .unwrap()
        }
    }

    fn request(sort: SortField, direction: SortDirection) -> PageRequest {
        PageRequest::new(0, 10, sort, direction).unwrap()
    }

    #[tokio::test]
    async fn test_save_and_load_with_category() {
        let fx = Fixture::new().await;
        let saved = fx.add("Café", "Café torrado 500g", 1899, &fx.bebidas).await;

        assert_eq!(saved.id, Some(1));
        let loaded = fx.repo().find_by_id(1).await.unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.base_price.amount(), dec!(18.99));
        assert_eq!(loaded.category.discount.value(), dec!(10));
        assert_eq!(loaded.registered_on, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());

        assert!(fx.repo().find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_product_sees_current_category_state() {
        let fx = Fixture::new().await;
        fx.add("Café", "Café torrado", 1000, &fx.bebidas).await;

        let mut renamed = fx.bebidas.clone();
        renamed.discount = Percentage::new(dec!(20));
        fx.db.categories().save(renamed).await.unwrap();

        let loaded = fx.repo().find_by_id(1).await.unwrap().unwrap();
        assert_eq!(loaded.category.discount.value(), dec!(20));
    }

    #[tokio::test]
    async fn test_update_keeps_registration_date() {
        let fx = Fixture::new().await;
        let mut product = fx.add("Café", "Café torrado", 1000, &fx.bebidas).await;
        let registered = product.registered_on;

        product.name = "Café Especial".to_string();
        product.registered_on = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        product.category = fx.limpeza.clone();
        let saved = fx.repo().save(product).await.unwrap();

        assert_eq!(saved.name, "Café Especial");
        assert_eq!(saved.registered_on, registered);
        assert_eq!(saved.category.name, "Limpeza");
    }

    #[tokio::test]
    async fn test_unknown_category_is_foreign_key_error() {
        let fx = Fixture::new().await;
        let mut ghost = fx.bebidas.clone();
        ghost.id = Some(404);

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = fx
            .repo()
            .save(Product::new("X", "x", Money::from_cents(100), date, ghost))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_referenced_category_cannot_be_deleted() {
        let fx = Fixture::new().await;
        let product = fx.add("Café", "Café torrado", 1000, &fx.bebidas).await;

        let err = fx.db.categories().delete(&fx.bebidas).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)), "got {err:?}");

        fx.repo().delete(&product).await.unwrap();
        fx.db.categories().delete(&fx.bebidas).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_is_missing() {
        let fx = Fixture::new().await;
        let product = fx.add("Café", "Café torrado", 1000, &fx.bebidas).await;
        fx.repo().delete(&product).await.unwrap();

        let err = fx.repo().delete(&product).await.unwrap_err();
        assert!(matches!(err, StoreError::Missing(_)));
        assert_eq!(fx.repo().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_filters_case_insensitive() {
        let fx = Fixture::new().await;
        fx.add("Café Pilão", "Café torrado e moído", 1899, &fx.bebidas).await;
        fx.add("Suco de Uva", "Suco integral", 999, &fx.bebidas).await;
        fx.add("Detergente", "Detergente neutro", 299, &fx.limpeza).await;

        let page = fx
            .repo()
            .search(
                &ProductFilter::new(None, None, Some("BEBI")),
                &request(SortField::BasePrice, SortDirection::Asc),
            )
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Suco de Uva", "Café Pilão"]);
        assert_eq!(page.total_elements, 2);

        let page = fx
            .repo()
            .search(
                &ProductFilter::new(Some("DETER"), Some("neutro"), None),
                &PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Detergente");
    }

    #[tokio::test]
    async fn test_search_folds_accented_text() {
        let fx = Fixture::new().await;
        let mercearia = fx
            .db
            .categories()
            .save(Category::new(
                "MERCEARIA ÚTIL",
                "Alimentos",
                Percentage::zero(),
                Percentage::zero(),
            ))
            .await
            .unwrap();
        fx.add("AÇÚCAR CRISTAL", "PACOTE DE 1KG, SEM ADIÇÃO", 499, &mercearia).await;
        fx.add("Arroz", "Tipo 1", 899, &mercearia).await;

        let by_name = fx
            .repo()
            .search(&ProductFilter::new(Some("açúcar"), None, None), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(by_name.total_elements, 1);
        assert_eq!(by_name.items[0].name, "AÇÚCAR CRISTAL");

        let by_description = fx
            .repo()
            .search(&ProductFilter::new(None, Some("Adição"), None), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(by_description.total_elements, 1);

        let by_category = fx
            .repo()
            .search(&ProductFilter::new(None, None, Some("útil")), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(by_category.total_elements, 2);
    }

    #[tokio::test]
    async fn test_update_refolds_search_columns() {
        let fx = Fixture::new().await;
        let mut product = fx.add("Suco", "Suco integral", 999, &fx.bebidas).await;

        product.name = "CAFÉ SOLÚVEL".to_string();
        fx.repo().save(product).await.unwrap();

        let found = fx
            .repo()
            .search(&ProductFilter::new(Some("café"), None, None), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(found.total_elements, 1);

        let stale = fx
            .repo()
            .search(&ProductFilter::new(Some("suco"), None, None), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(stale.total_elements, 0);
    }

    #[tokio::test]
    async fn test_search_wildcards_are_literal() {
        let fx = Fixture::new().await;
        fx.add("Desconto 100%", "Promo", 100, &fx.bebidas).await;
        fx.add("Desconto 1000", "Promo", 100, &fx.bebidas).await;
        fx.add("suco_uva", "Promo", 100, &fx.bebidas).await;
        fx.add("sucoXuva", "Promo", 100, &fx.bebidas).await;

        let page = fx
            .repo()
            .search(&ProductFilter::new(Some("0%"), None, None), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.items[0].name, "Desconto 100%");

        let page = fx
            .repo()
            .search(&ProductFilter::new(Some("o_u"), None, None), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.items[0].name, "suco_uva");
    }

    #[tokio::test]
    async fn test_price_sort_is_numeric() {
        let fx = Fixture::new().await;
        fx.add("Dez", "x", 1000, &fx.bebidas).await;
        fx.add("Nove", "x", 900, &fx.bebidas).await;
        fx.add("Cem", "x", 10000, &fx.bebidas).await;

        let page = fx
            .repo()
            .search(
                &ProductFilter::default(),
                &request(SortField::BasePrice, SortDirection::Desc),
            )
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
        // As text "9.00" > "100.00" > "10.00"
        assert_eq!(names, vec!["Cem", "Dez", "Nove"]);
    }

    #[tokio::test]
    async fn test_ties_break_on_id() {
        let fx = Fixture::new().await;
        for name in ["A", "B", "C"] {
            fx.add(name, "x", 500, &fx.bebidas).await;
        }

        let page = fx
            .repo()
            .search(
                &ProductFilter::default(),
                &request(SortField::BasePrice, SortDirection::Desc),
            )
            .await
            .unwrap();
        let ids: Vec<_> = page.items.iter().map(|p| p.id.unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_paging_totals() {
        let fx = Fixture::new().await;
        for i in 1..=7 {
            fx.add(&format!("Produto {i}"), "x", i * 100, &fx.bebidas).await;
        }

        let second = PageRequest::new(1, 3, SortField::Id, SortDirection::Asc).unwrap();
        let page = fx
            .repo()
            .search(&ProductFilter::default(), &second)
            .await
            .unwrap();
        let ids: Vec<_> = page.items.iter().map(|p| p.id.unwrap()).collect();
        assert_eq!(ids, vec![4, 5, 6]);
        assert_eq!(page.total_elements, 7);
        assert_eq!(page.total_pages, 3);

        let past_end = PageRequest::new(5, 3, SortField::Id, SortDirection::Asc).unwrap();
        let page = fx
            .repo()
            .search(&ProductFilter::default(), &past_end)
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_elements, 7);
    }
}
