//! # catalog-core: Business Logic for the Product Catalog
//!
//! Categories, products, and the final-price rule that ties them together.
//! Storage is reached only through the [`store`] traits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    catalog-api (axum)                           │   │
//! │  │    /categoria ──► /produtos ──► /produtos/{id}/preco-final      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ request DTOs                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ catalog-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  service  │  │  pricing  │  │    dto    │  │ validation│  │   │
//! │  │   │ Category  │  │ discount  │  │ requests  │  │  fields   │  │   │
//! │  │   │ Product   │  │ or tax    │  │ responses │  │  rules    │  │   │
//! │  │   └─────┬─────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │         │ Arc<dyn CategoryStore / ProductStore>                 │   │
//! │  └─────────┼───────────────────────────────────────────────────────┘   │
//! │            │                                                            │
//! │  ┌─────────▼───────────────────────────────────────────────────────┐   │
//! │  │   catalog-db (SQLite)         or   store::memory::MemoryStore   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Category, Product, Percentage
//! - [`money`] - Decimal money with half-up rounding
//! - [`pricing`] - Discount/tax selection and the final price
//! - [`format`] - Currency, percentage and date rendering
//! - [`validation`] - Field validators and business rules
//! - [`dto`] - Wire requests/responses and entity mapping
//! - [`pagination`] - Filter, sort and page parameters
//! - [`store`] - Storage traits plus an in-memory implementation
//! - [`service`] - The category and product operations
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::money::Money;
//! use catalog_core::pricing::{final_price, PriceAdjustment};
//! use catalog_core::types::Percentage;
//! use rust_decimal::Decimal;
//!
//! let base = Money::from_cents(10000); // R$ 100,00
//! let discount = PriceAdjustment::Discount(Percentage::new(Decimal::TEN));
//!
//! let price = final_price(base, discount).unwrap();
//! assert_eq!(price.to_string(), "R$ 90,00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dto;
pub mod error;
pub mod format;
pub mod messages;
pub mod money;
pub mod pagination;
pub mod pricing;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, StoreError, ValidationError};
pub use money::Money;
pub use service::{CategoryService, ProductService};
pub use store::{CategoryStore, ProductStore};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Decimal places of every rounded amount.
pub const CURRENCY_SCALE: u32 = 2;

/// Upper bound of a category discount, in percent.
pub const MAX_DISCOUNT_PERCENT: rust_decimal::Decimal = rust_decimal::Decimal::ONE_HUNDRED;

/// Page size used when the client does not send one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
