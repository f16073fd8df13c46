//! # Category Repository
//!
//! SQLite implementation of [`CategoryStore`].
//!
//! ## Row Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  categories row                         Category                        │
//! │  ───────────────                        ────────                        │
//! │  id          INTEGER  ───────────────►  id: Some(i64)                   │
//! │  name        TEXT     ───────────────►  name                            │
//! │  description TEXT     ───────────────►  description                     │
//! │  tax         TEXT "5" ── parse ──────►  tax: Percentage(5)              │
//! │  discount    TEXT "0" ── parse ──────►  discount: Percentage(0)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use async_trait::async_trait;
use catalog_core::error::StoreResult;
use catalog_core::pagination::fold_case;
use catalog_core::store::CategoryStore;
use catalog_core::{Category, CategoryId, Percentage};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

// =============================================================================
// Row Type
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub tax: String,
    pub discount: String,
}

impl TryFrom<CategoryRow> for Category {
    type Error = DbError;

    fn try_from(row: CategoryRow) -> DbResult<Self> {
        Ok(Category {
            id: Some(row.id),
            tax: parse_percentage("categories.tax", &row.tax)?,
            discount: parse_percentage("categories.discount", &row.discount)?,
            name: row.name,
            description: row.description,
        })
    }
}

fn parse_percentage(column: &'static str, text: &str) -> DbResult<Percentage> {
    Decimal::from_str(text)
        .map(Percentage::new)
        .map_err(|_| DbError::corrupt(column, text))
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Exact, case-sensitive lookup by the unique name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, description, tax, discount
            FROM categories
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Category::try_from).transpose()
    }

    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, description, tax, discount
            FROM categories
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded categories");
        rows.into_iter().map(Category::try_from).collect()
    }

    /// Inserts a category and returns its new id.
    pub async fn insert(&self, category: &Category) -> DbResult<CategoryId> {
        debug!(name = %category.name, "Inserting category");

        let result = sqlx::query(
            r#"
            INSERT INTO categories (name, name_folded, description, tax, discount)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&category.name)
        .bind(fold_case(&category.name))
        .bind(&category.description)
        .bind(category.tax.value().to_string())
        .bind(category.discount.value().to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites every column of an existing category.
    pub async fn update(&self, id: CategoryId, category: &Category) -> DbResult<()> {
        debug!(id, name = %category.name, "Updating category");

        let result = sqlx::query(
            r#"
            UPDATE categories SET
                name = ?2,
                name_folded = ?3,
                description = ?4,
                tax = ?5,
                discount = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&category.name)
        .bind(fold_case(&category.name))
        .bind(&category.description)
        .bind(category.tax.value().to_string())
        .bind(category.discount.value().to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }
        Ok(())
    }

    /// Deletes a category. Fails with a foreign key violation while products
    /// reference it.
    pub async fn remove(&self, id: CategoryId) -> DbResult<()> {
        debug!(id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Store Implementation
// =============================================================================

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        Ok(self.get_by_name(name).await?)
    }

    async fn find_all(&self) -> StoreResult<Vec<Category>> {
        Ok(self.list().await?)
    }

    async fn save(&self, mut category: Category) -> StoreResult<Category> {
        match category.id {
            Some(id) => self.update(id, &category).await?,
            None => category.id = Some(self.insert(&category).await?),
        }
        Ok(category)
    }

    async fn delete(&self, category: &Category) -> StoreResult<()> {
        let id = category
            .id
            .ok_or_else(|| DbError::not_found("Category", &category.name))?;
        Ok(self.remove(id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
