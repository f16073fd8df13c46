//! # Data Transfer Objects
//!
//! Request and response bodies, with the mappings between them and the
//! domain types.
//!
//! ## Wire Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Category request             Category response                         │
//! │  ─────────────────            ─────────────────                         │
//! │  nomeCategoria                nomeCategoria                             │
//! │  descricaoCategoria           descricaoCategoria                        │
//! │  taxa      (decimal)          taxa      "10%"                           │
//! │  desconto  (decimal)          desconto  "0%"                            │
//! │                                                                         │
//! │  Product request              Product response                          │
//! │  ─────────────────            ─────────────────                         │
//! │  nomeProduto                  idProduto                                 │
//! │  descricaoProduto             nomeProduto / descricaoProduto            │
//! │  precoBase (decimal)          precoBase    "R$ 1.234,56"                │
//! │  nomeCategoria                nomeCategoria                             │
//! │                               dataCadastro "dd/mm/yyyy"                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every request field is optional at the JSON level. Registration requires
//! them through [`Validate`]; updates only overwrite what is present.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::FieldErrors;
use crate::format::{format_currency, format_date, format_percentage};
use crate::money::Money;
use crate::pagination::{Page, PageRequest, ProductFilter, SortDirection, SortField};
use crate::types::{Category, Percentage, Product, ProductId};
use crate::validation::{
    fields, messages, reject_blank, require_base_price, require_text, validate_base_price,
    validate_discount, validate_tax, Validate, ValidationResult,
};
use crate::DEFAULT_PAGE_SIZE;

// =============================================================================
// Category Requests
// =============================================================================

/// Body of `POST /categoria`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterCategoryRequest {
    #[serde(rename = "nomeCategoria", default)]
    pub name: Option<String>,

    #[serde(rename = "descricaoCategoria", default)]
    pub description: Option<String>,

    /// Absent means zero.
    #[serde(rename = "taxa", default)]
    #[ts(as = "Option<String>")]
    pub tax: Option<Decimal>,

    /// Absent means zero.
    #[serde(rename = "desconto", default)]
    #[ts(as = "Option<String>")]
    pub discount: Option<Decimal>,
}

impl RegisterCategoryRequest {
    /// Builds the unsaved category. Call after [`Validate::validate`].
    pub fn into_category(self) -> Category {
        Category::new(
            self.name.unwrap_or_default(),
            self.description.unwrap_or_default(),
            Percentage::new(self.tax.unwrap_or_default()),
            Percentage::new(self.discount.unwrap_or_default()),
        )
    }
}

impl Validate for RegisterCategoryRequest {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = FieldErrors::new();
        errors.check(require_text(
            fields::CATEGORY_NAME,
            self.name.as_deref(),
            messages::CATEGORY_NAME_REQUIRED,
        ));
        errors.check(require_text(
            fields::CATEGORY_DESCRIPTION,
            self.description.as_deref(),
            messages::CATEGORY_DESCRIPTION_REQUIRED,
        ));
        errors.check(validate_tax(self.tax));
        errors.check(validate_discount(self.discount));
        errors.into_result()
    }
}

/// Body of `PUT /categoria/{nome}`. Same shape as registration, all partial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateCategoryRequest {
    #[serde(rename = "nomeCategoria", default)]
    pub name: Option<String>,

    #[serde(rename = "descricaoCategoria", default)]
    pub description: Option<String>,

    #[serde(rename = "taxa", default)]
    #[ts(as = "Option<String>")]
    pub tax: Option<Decimal>,

    #[serde(rename = "desconto", default)]
    #[ts(as = "Option<String>")]
    pub discount: Option<Decimal>,
}

impl UpdateCategoryRequest {
    /// Merges the request into an existing category.
    ///
    /// Text fields overwrite when present. `taxa`/`desconto` overwrite only
    /// when present AND non-zero: a zero cannot clear an adjustment.
    pub fn apply_to(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        if let Some(description) = &self.description {
            category.description = description.clone();
        }
        if let Some(tax) = self.tax.filter(|t| !t.is_zero()) {
            category.tax = Percentage::new(tax);
        }
        if let Some(discount) = self.discount.filter(|d| !d.is_zero()) {
            category.discount = Percentage::new(discount);
        }
    }
}

impl Validate for UpdateCategoryRequest {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = FieldErrors::new();
        errors.check(reject_blank(
            fields::CATEGORY_NAME,
            self.name.as_deref(),
            messages::CATEGORY_NAME_REQUIRED,
        ));
        errors.check(reject_blank(
            fields::CATEGORY_DESCRIPTION,
            self.description.as_deref(),
            messages::CATEGORY_DESCRIPTION_REQUIRED,
        ));
        errors.check(validate_tax(self.tax));
        errors.check(validate_discount(self.discount));
        errors.into_result()
    }
}

// =============================================================================
// Product Requests
// =============================================================================

/// Body of `POST /produtos`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterProductRequest {
    #[serde(rename = "nomeProduto", default)]
    pub name: Option<String>,

    #[serde(rename = "descricaoProduto", default)]
    pub description: Option<String>,

    #[serde(rename = "precoBase", default)]
    #[ts(as = "Option<String>")]
    pub base_price: Option<Decimal>,

    /// Name of an existing category.
    #[serde(rename = "nomeCategoria", default)]
    pub category_name: Option<String>,
}

impl RegisterProductRequest {
    /// Builds the unsaved product. Call after [`Validate::validate`].
    pub fn into_product(self, category: Category, registered_on: NaiveDate) -> Product {
        Product::new(
            self.name.unwrap_or_default(),
            self.description.unwrap_or_default(),
            Money::new(self.base_price.unwrap_or_default()),
            registered_on,
            category,
        )
    }
}

impl Validate for RegisterProductRequest {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = FieldErrors::new();
        errors.check(require_text(
            fields::PRODUCT_NAME,
            self.name.as_deref(),
            messages::PRODUCT_NAME_REQUIRED,
        ));
        errors.check(require_text(
            fields::PRODUCT_DESCRIPTION,
            self.description.as_deref(),
            messages::PRODUCT_DESCRIPTION_REQUIRED,
        ));
        errors.check(require_base_price(self.base_price));
        errors.check(validate_base_price(self.base_price));
        errors.check(require_text(
            fields::CATEGORY_NAME,
            self.category_name.as_deref(),
            messages::PRODUCT_CATEGORY_REQUIRED,
        ));
        errors.into_result()
    }
}

/// Body of `PUT /produtos/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateProductRequest {
    #[serde(rename = "nomeProduto", default)]
    pub name: Option<String>,

    #[serde(rename = "descricaoProduto", default)]
    pub description: Option<String>,

    #[serde(rename = "precoBase", default)]
    #[ts(as = "Option<String>")]
    pub base_price: Option<Decimal>,

    #[serde(rename = "nomeCategoria", default)]
    pub category_name: Option<String>,
}

impl UpdateProductRequest {
    /// Overwrites name, description and base price when present.
    ///
    /// The category is resolved by the service, not here.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.base_price {
            product.base_price = Money::new(price);
        }
    }
}

impl Validate for UpdateProductRequest {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = FieldErrors::new();
        errors.check(reject_blank(
            fields::PRODUCT_NAME,
            self.name.as_deref(),
            messages::PRODUCT_NAME_REQUIRED,
        ));
        errors.check(reject_blank(
            fields::PRODUCT_DESCRIPTION,
            self.description.as_deref(),
            messages::PRODUCT_DESCRIPTION_REQUIRED,
        ));
        errors.check(validate_base_price(self.base_price));
        errors.check(reject_blank(
            fields::CATEGORY_NAME,
            self.category_name.as_deref(),
            messages::PRODUCT_CATEGORY_REQUIRED,
        ));
        errors.into_result()
    }
}

// =============================================================================
// Product Search
// =============================================================================

/// Query string of `GET /produtos`.
///
/// Defaults: page 0, size 10, sorted by `precoBase` ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ProductQuery {
    #[serde(rename = "nomeProduto")]
    pub name: Option<String>,

    #[serde(rename = "descricao")]
    pub description: Option<String>,

    #[serde(rename = "nomeCategoria")]
    pub category_name: Option<String>,

    /// Zero-based.
    #[serde(rename = "numeroPagina")]
    pub page_index: u32,

    #[serde(rename = "tamanhoPagina")]
    pub page_size: u32,

    #[serde(rename = "sortBy")]
    pub sort_by: String,

    /// `desc` (any case) or anything else for ascending.
    pub direction: String,
}

impl Default for ProductQuery {
    fn default() -> Self {
        ProductQuery {
            name: None,
            description: None,
            category_name: None,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: SortField::default().wire_name().to_string(),
            direction: "asc".to_string(),
        }
    }
}

impl ProductQuery {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter::new(
            self.name.as_deref(),
            self.description.as_deref(),
            self.category_name.as_deref(),
        )
    }

    /// ## Errors
    /// Unknown `sortBy` or a page size of zero.
    pub fn page_request(&self) -> ValidationResult<PageRequest> {
        let sort: SortField = self.sort_by.parse()?;
        PageRequest::new(
            self.page_index,
            self.page_size,
            sort,
            SortDirection::parse_lenient(&self.direction),
        )
    }
}

// =============================================================================
// Responses
// =============================================================================

/// A category in display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryResponse {
    #[serde(rename = "nomeCategoria")]
    pub name: String,
    #[serde(rename = "descricaoCategoria")]
    pub description: String,
    /// e.g. `"10%"`
    #[serde(rename = "taxa")]
    pub tax: String,
    #[serde(rename = "desconto")]
    pub discount: String,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        CategoryResponse {
            name: category.name.clone(),
            description: category.description.clone(),
            tax: format_percentage(&category.tax),
            discount: format_percentage(&category.discount),
        }
    }
}

/// A product in display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductResponse {
    #[serde(rename = "idProduto")]
    #[ts(type = "number | null")]
    pub id: Option<ProductId>,
    #[serde(rename = "nomeProduto")]
    pub name: String,
    #[serde(rename = "descricaoProduto")]
    pub description: String,
    /// Formatted currency, e.g. `"R$ 10,00"`.
    #[serde(rename = "precoBase")]
    pub base_price: String,
    #[serde(rename = "nomeCategoria")]
    pub category_name: String,
    #[serde(rename = "dataCadastro")]
    pub registered_on: String,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            base_price: format_currency(&product.base_price),
            category_name: product.category.name.clone(),
            registered_on: format_date(product.registered_on),
        }
    }
}

/// Result of the final price calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinalPriceResponse {
    #[serde(rename = "idProduto")]
    #[ts(type = "number | null")]
    pub id: Option<ProductId>,
    #[serde(rename = "nomeProduto")]
    pub name: String,
    #[serde(rename = "descricaoProduto")]
    pub description: String,
    #[serde(rename = "precoFinal")]
    pub final_price: String,
    #[serde(rename = "nomeCategoria")]
    pub category_name: String,
    #[serde(rename = "dataCadastro")]
    pub registered_on: String,
}

impl FinalPriceResponse {
    pub fn new(product: &Product, final_price: Money) -> Self {
        FinalPriceResponse {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            final_price: format_currency(&final_price),
            category_name: product.category.name.clone(),
            registered_on: format_date(product.registered_on),
        }
    }
}

/// One page of the product search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPageResponse {
    #[serde(rename = "numeroDePaginas")]
    #[ts(type = "number")]
    pub total_pages: u64,
    #[serde(rename = "totalRegistros")]
    #[ts(type = "number")]
    pub total_elements: u64,
    #[serde(rename = "produtos")]
    pub products: Vec<ProductResponse>,
}

impl From<Page<Product>> for ProductPageResponse {
    fn from(page: Page<Product>) -> Self {
        let page = page.map(|product| ProductResponse::from(&product));
        ProductPageResponse {
            total_pages: page.total_pages,
            total_elements: page.total_elements,
            products: page.items,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
