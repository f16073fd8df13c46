//! Category operations.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::persistence_failure;
use crate::dto::{CategoryResponse, RegisterCategoryRequest, UpdateCategoryRequest};
use crate::error::{CoreError, CoreResult, Operation, ValidationError};
use crate::store::CategoryStore;
use crate::types::Category;
use crate::validation::{validate_exclusive_adjustment, Validate};

/// Registers, lists, updates and deletes categories.
#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        CategoryService { store }
    }

    /// Registers a new category and returns its name.
    ///
    /// ## Checks, in order
    /// 1. Field validation (all invalid fields reported together)
    /// 2. Name not already taken
    /// 3. Discount and tax not both non-zero
    pub async fn register(&self, request: RegisterCategoryRequest) -> CoreResult<String> {
        debug!(name = ?request.name, "Registering category");
        request.validate()?;

        let name = request.name.as_deref().unwrap_or_default();
        self.ensure_name_free(name).await?;
        validate_exclusive_adjustment(request.tax, request.discount).inspect_err(|_| {
            warn!(name, "Rejected category with both discount and tax");
        })?;

        let saved = self
            .store
            .save(request.into_category())
            .await
            .map_err(|e| persistence_failure(Operation::RegisterCategory, e))?;

        info!(id = ?saved.id, name = %saved.name, "Category registered");
        Ok(saved.name)
    }

    /// All categories in display form.
    ///
    /// ## Errors
    /// [`CoreError::NoCategories`] when nothing is registered.
    pub async fn list(&self) -> CoreResult<Vec<CategoryResponse>> {
        let categories = self
            .store
            .find_all()
            .await
            .map_err(|e| persistence_failure(Operation::ReadCategory, e))?;

        if categories.is_empty() {
            return Err(CoreError::NoCategories);
        }
        Ok(categories.iter().map(CategoryResponse::from).collect())
    }

    pub async fn get_by_name(&self, name: &str) -> CoreResult<CategoryResponse> {
        let category = self.load(name).await?;
        Ok(CategoryResponse::from(&category))
    }

    /// Partially updates a category.
    ///
    /// The duplicate-name and discount/tax checks look at the incoming request
    /// only. A request naming the category's own current name is rejected as a
    /// duplicate.
    pub async fn update(&self, name: &str, request: UpdateCategoryRequest) -> CoreResult<Category> {
        debug!(name, "Updating category");
        request.validate()?;

        let mut category = self.load(name).await?;
        if let Some(new_name) = request.name.as_deref() {
            self.ensure_name_free(new_name).await?;
        }
        validate_exclusive_adjustment(request.tax, request.discount).inspect_err(|_| {
            warn!(name, "Rejected category update with both discount and tax");
        })?;

        request.apply_to(&mut category);
        let saved = self
            .store
            .save(category)
            .await
            .map_err(|e| persistence_failure(Operation::UpdateCategory, e))?;

        info!(id = ?saved.id, name = %saved.name, "Category updated");
        Ok(saved)
    }

    /// Deletes a category. Fails with a persistence error while products
    /// still reference it.
    pub async fn delete(&self, name: &str) -> CoreResult<()> {
        debug!(name, "Deleting category");
        let category = self.load(name).await?;

        self.store
            .delete(&category)
            .await
            .map_err(|e| persistence_failure(Operation::DeleteCategory, e))?;

        info!(id = ?category.id, name, "Category deleted");
        Ok(())
    }

    async fn load(&self, name: &str) -> CoreResult<Category> {
        self.store
            .find_by_name(name)
            .await
            .map_err(|e| persistence_failure(Operation::ReadCategory, e))?
            .ok_or_else(|| CoreError::CategoryNotFound(name.to_string()))
    }

    async fn ensure_name_free(&self, name: &str) -> CoreResult<()> {
        let existing = self
            .store
            .find_by_name(name)
            .await
            .map_err(|e| persistence_failure(Operation::ReadCategory, e))?;

        if existing.is_some() {
            warn!(name, "Category name already registered");
            return Err(ValidationError::DuplicateCategory {
                name: name.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, StoreError};
    use crate::store::memory::MemoryStore;
    use rust_decimal_macros::dec;

    fn service() -> (CategoryService, MemoryStore) {
        let store = MemoryStore::new();
        (CategoryService::new(Arc::new(store.clone())), store)
    }

    fn request(name: &str) -> RegisterCategoryRequest {
        RegisterCategoryRequest {
            name: Some(name.to_string()),
            description: Some(format!("{name} em geral")),
            tax: None,
            discount: None,
        }
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let (service, _) = service();
        let name = service
            .register(RegisterCategoryRequest {
                discount: Some(dec!(10)),
                tax: Some(dec!(0)),
                ..request("Bebidas")
            })
            .await
            .unwrap();
        assert_eq!(name, "Bebidas");

        let response = service.get_by_name("Bebidas").await.unwrap();
        assert_eq!(response.discount, "10%");
        assert_eq!(response.tax, "0%");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_validation_error() {
        let (service, _) = service();
        service.register(request("Bebidas")).await.unwrap();

        let err = service.register(request("Bebidas")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Uma categoria com nome: Bebidas, já foi cadastrada!");

        // Names are case-sensitive
        assert!(service.register(request("bebidas")).await.is_ok());
    }

    #[tokio::test]
    async fn test_discount_and_tax_rejected() {
        let (service, store) = service();
        let err = service
            .register(RegisterCategoryRequest {
                tax: Some(dec!(5)),
                discount: Some(dec!(10)),
                ..request("Bebidas")
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(ValidationError::DiscountAndTax)));
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_field_errors_come_before_store_access() {
        let (service, store) = service();
        store.fail_reads(true);

        let err = service
            .register(RegisterCategoryRequest::default())
            .await
            .unwrap_err();
        let CoreError::Validation(ValidationError::Fields(errors)) = err else {
            panic!("expected field errors, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
    }

    #[tokio::test]
    async fn test_list_empty_is_not_found() {
        let (service, _) = service();
        let err = service.list().await.unwrap_err();
        assert!(matches!(err, CoreError::NoCategories));
        assert_eq!(err.to_string(), "nenhuma categoria cadastrada!");

        service.register(request("A")).await.unwrap();
        service.register(request("B")).await.unwrap();
        let names: Vec<_> = service.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let (service, _) = service();
        let err = service.get_by_name("Nada").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "nenhuma categoria cadastrada com esse nome!");
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let (service, _) = service();
        service
            .register(RegisterCategoryRequest {
                tax: Some(dec!(5)),
                ..request("Bebidas")
            })
            .await
            .unwrap();

        let updated = service
            .update(
                "Bebidas",
                UpdateCategoryRequest {
                    name: Some("Drinks".to_string()),
                    tax: Some(dec!(0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Drinks");
        assert_eq!(updated.description, "Bebidas em geral");
        // Zero is treated as "not sent"
        assert_eq!(updated.tax.value(), dec!(5));
        assert!(service.get_by_name("Bebidas").await.is_err());
    }

    #[tokio::test]
    async fn test_update_to_own_name_is_duplicate() {
        let (service, _) = service();
        service.register(request("Bebidas")).await.unwrap();

        let err = service
            .update(
                "Bebidas",
                UpdateCategoryRequest {
                    name: Some("Bebidas".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::DuplicateCategory { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_checks_request_not_merged_state() {
        let (service, _) = service();
        service
            .register(RegisterCategoryRequest {
                tax: Some(dec!(5)),
                ..request("Bebidas")
            })
            .await
            .unwrap();

        // The request alone carries only a discount, so it passes
        let updated = service
            .update(
                "Bebidas",
                UpdateCategoryRequest {
                    discount: Some(dec!(10)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.has_discount_and_tax());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (service, _) = service();
        let err = service
            .update("Nada", UpdateCategoryRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::CategoryNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, _) = service();
        service.register(request("Bebidas")).await.unwrap();
        service.delete("Bebidas").await.unwrap();

        let err = service.delete("Bebidas").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_store_failure_is_persistence_error() {
        let (service, store) = service();
        service.register(request("Bebidas")).await.unwrap();
        store.fail_writes(true);

        let err = service.delete("Bebidas").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(
            err.to_string(),
            "Erro ao excluir categoria, entre em contato com o administrador!"
        );
        assert!(matches!(
            err,
            CoreError::Persistence {
                source: StoreError::Backend(_),
                ..
            }
        ));

        let err = service.register(request("Outra")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Erro ao inserir categoria, entre em contato com o administrador!"
        );
    }
}
