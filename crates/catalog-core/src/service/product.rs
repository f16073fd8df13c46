//! Product operations and the final price calculation.

use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info};

use super::persistence_failure;
use crate::dto::{
    FinalPriceResponse, ProductPageResponse, ProductQuery, ProductResponse,
    RegisterProductRequest, UpdateProductRequest,
};
use crate::error::{CoreError, CoreResult, Operation, StoreError};
use crate::pricing::final_price_for;
use crate::store::{CategoryStore, ProductStore};
use crate::types::{Category, Product, ProductId};
use crate::validation::Validate;

/// Registers, searches, updates and prices products.
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStore>, categories: Arc<dyn CategoryStore>) -> Self {
        ProductService {
            products,
            categories,
        }
    }

    /// Registers a product under an existing category, dated today.
    ///
    /// Returns the store-assigned id.
    pub async fn register(&self, request: RegisterProductRequest) -> CoreResult<ProductId> {
        debug!(name = ?request.name, category = ?request.category_name, "Registering product");
        request.validate()?;

        let category = self
            .resolve_category(request.category_name.as_deref().unwrap_or_default())
            .await?;
        let product = request.into_product(category, Local::now().date_naive());

        let saved = self
            .products
            .save(product)
            .await
            .map_err(|e| persistence_failure(Operation::RegisterProduct, e))?;

        let id = saved.id.ok_or_else(|| {
            persistence_failure(
                Operation::RegisterProduct,
                StoreError::Backend("store returned no id".to_string()),
            )
        })?;
        info!(id, name = %saved.name, "Product registered");
        Ok(id)
    }

    pub async fn get_by_id(&self, id: ProductId) -> CoreResult<ProductResponse> {
        let product = self.load(id).await?;
        Ok(ProductResponse::from(&product))
    }

    /// Overwrites each field present in the request.
    ///
    /// A new category name is resolved against the store; the registration
    /// date never changes.
    pub async fn update(&self, id: ProductId, request: UpdateProductRequest) -> CoreResult<Product> {
        debug!(id, "Updating product");
        request.validate()?;

        let mut product = self.load(id).await?;
        request.apply_to(&mut product);
        if let Some(category_name) = request.category_name.as_deref() {
            product.category = self.resolve_category(category_name).await?;
        }

        let saved = self
            .products
            .save(product)
            .await
            .map_err(|e| persistence_failure(Operation::UpdateProduct, e))?;

        info!(id, name = %saved.name, "Product updated");
        Ok(saved)
    }

    pub async fn delete(&self, id: ProductId) -> CoreResult<()> {
        debug!(id, "Deleting product");
        let product = self.load(id).await?;

        self.products
            .delete(&product)
            .await
            .map_err(|e| persistence_failure(Operation::DeleteProduct, e))?;

        info!(id, "Product deleted");
        Ok(())
    }

    /// Filtered, sorted, paged product listing.
    ///
    /// ## Errors
    /// - Validation: unknown sort field, page size zero
    /// - [`CoreError::NoProducts`]: the requested page is empty
    pub async fn list_paged(&self, query: &ProductQuery) -> CoreResult<ProductPageResponse> {
        let page_request = query.page_request()?;
        let filter = query.filter();
        debug!(?filter, ?page_request, "Searching products");

        let page = self
            .products
            .search(&filter, &page_request)
            .await
            .map_err(|e| persistence_failure(Operation::ReadProduct, e))?;

        if page.is_empty() {
            return Err(CoreError::NoProducts);
        }
        Ok(ProductPageResponse::from(page))
    }

    /// Base price adjusted by the category's discount or tax.
    pub async fn compute_final_price(&self, id: ProductId) -> CoreResult<FinalPriceResponse> {
        let product = self.load(id).await?;
        let final_price = final_price_for(product.base_price, &product.category)?;

        debug!(
            id,
            base = %product.base_price.amount(),
            final_price = %final_price.amount(),
            "Computed final price"
        );
        Ok(FinalPriceResponse::new(&product, final_price))
    }

    async fn load(&self, id: ProductId) -> CoreResult<Product> {
        self.products
            .find_by_id(id)
            .await
            .map_err(|e| persistence_failure(Operation::ReadProduct, e))?
            .ok_or(CoreError::ProductNotFound(id))
    }

    async fn resolve_category(&self, name: &str) -> CoreResult<Category> {
        self.categories
            .find_by_name(name)
            .await
            .map_err(|e| persistence_failure(Operation::ReadCategory, e))?
            .ok_or_else(|| CoreError::CategoryNotFound(name.to_string()))
    }
}
