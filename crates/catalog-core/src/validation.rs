//! # Validation Module
//!
//! Input validation for the catalog services.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP adapter (catalog-api)                                   │
//! │  └── JSON shape / types (serde deserialization)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Field validation (THIS MODULE, via `Validate`)               │
//! │  ├── Required / non-blank text                                         │
//! │  ├── Ranges (price > 0, tax ≥ 0, 0 ≤ discount ≤ 100)                   │
//! │  └── ALL invalid fields collected into one FieldErrors                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Business rules (THIS MODULE + services)                      │
//! │  ├── Discount and tax are mutually exclusive                           │
//! │  └── Unique category name (service, then UNIQUE in SQLite)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::validation::{fields, validate_tax};
//! use rust_decimal::Decimal;
//!
//! assert!(validate_tax(Some(Decimal::TEN)).is_ok());
//! assert!(validate_tax(Some(-Decimal::ONE)).is_err());
//! assert!(validate_tax(None).is_ok());
//! # let _ = fields::TAX;
//! ```

use rust_decimal::Decimal;

use crate::error::{FieldError, ValidationError};
use crate::MAX_DISCOUNT_PERCENT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result of checking a single field.
pub type FieldResult = Result<(), FieldError>;

/// Implemented by request payloads that carry field-level constraints.
pub trait Validate {
    /// Checks every field and reports all failures at once.
    fn validate(&self) -> ValidationResult<()>;
}

/// Wire names of the validated fields, as reported in `campo`.
pub mod fields {
    pub const CATEGORY_NAME: &str = "nomeCategoria";
    pub const CATEGORY_DESCRIPTION: &str = "descricaoCategoria";
    pub const TAX: &str = "taxa";
    pub const DISCOUNT: &str = "desconto";
    pub const PRODUCT_NAME: &str = "nomeProduto";
    pub const PRODUCT_DESCRIPTION: &str = "descricaoProduto";
    pub const BASE_PRICE: &str = "precoBase";
}

/// Field messages.
pub mod messages {
    pub const CATEGORY_NAME_REQUIRED: &str = "nome da categoria é obrigatório!";
    pub const CATEGORY_DESCRIPTION_REQUIRED: &str = "descrição da categoria é obrigatório!";
    pub const TAX_NEGATIVE: &str = "a taxa não pode ser negativa!";
    pub const DISCOUNT_NEGATIVE: &str = "o desconto não pode ser negativo!";
    pub const DISCOUNT_ABOVE_MAX: &str = "o desconto não pode ser maior que 100%";
    pub const PRODUCT_NAME_REQUIRED: &str = "nome do produto é obrigatório!";
    pub const PRODUCT_DESCRIPTION_REQUIRED: &str = "descrição do produto é obrigatória!";
    pub const BASE_PRICE_REQUIRED: &str = "preço base é obrigatório!";
    pub const BASE_PRICE_NOT_POSITIVE: &str = "o preço base deve ser maior que 0!";
    pub const PRODUCT_CATEGORY_REQUIRED: &str = "categoria é obrigatória!";
}

// =============================================================================
// Text Validators
// =============================================================================

/// Fails when the value is absent or only whitespace.
pub fn require_text(field: &str, value: Option<&str>, message: &str) -> FieldResult {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(()),
        _ => Err(FieldError::new(field, message)),
    }
}

/// Fails when a value is present but blank. Absent is fine (partial update).
pub fn reject_blank(field: &str, value: Option<&str>, message: &str) -> FieldResult {
    match value {
        Some(text) if text.trim().is_empty() => Err(FieldError::new(field, message)),
        _ => Ok(()),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Fails when absent.
pub fn require_base_price(value: Option<Decimal>) -> FieldResult {
    match value {
        Some(_) => Ok(()),
        None => Err(FieldError::new(fields::BASE_PRICE, messages::BASE_PRICE_REQUIRED)),
    }
}

/// Fails when present and not strictly positive.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_base_price;
/// use rust_decimal::Decimal;
///
/// assert!(validate_base_price(Some(Decimal::new(1, 2))).is_ok()); // 0.01
/// assert!(validate_base_price(Some(Decimal::ZERO)).is_err());
/// ```
pub fn validate_base_price(value: Option<Decimal>) -> FieldResult {
    match value {
        Some(price) if price <= Decimal::ZERO => Err(FieldError::new(
            fields::BASE_PRICE,
            messages::BASE_PRICE_NOT_POSITIVE,
        )),
        _ => Ok(()),
    }
}

/// Tax may be any non-negative percentage.
pub fn validate_tax(value: Option<Decimal>) -> FieldResult {
    match value {
        Some(tax) if tax < Decimal::ZERO => {
            Err(FieldError::new(fields::TAX, messages::TAX_NEGATIVE))
        }
        _ => Ok(()),
    }
}

/// Discount must lie in `0..=100`.
pub fn validate_discount(value: Option<Decimal>) -> FieldResult {
    match value {
        Some(discount) if discount < Decimal::ZERO => Err(FieldError::new(
            fields::DISCOUNT,
            messages::DISCOUNT_NEGATIVE,
        )),
        Some(discount) if discount > MAX_DISCOUNT_PERCENT => Err(FieldError::new(
            fields::DISCOUNT,
            messages::DISCOUNT_ABOVE_MAX,
        )),
        _ => Ok(()),
    }
}

// =============================================================================
// Business Rules
// =============================================================================

/// Discount and tax cannot both be non-zero in the same request.
///
/// Absent values count as zero.
pub fn validate_exclusive_adjustment(
    tax: Option<Decimal>,
    discount: Option<Decimal>,
) -> ValidationResult<()> {
    let tax = tax.unwrap_or_default();
    let discount = discount.unwrap_or_default();

    if !tax.is_zero() && !discount.is_zero() {
        return Err(ValidationError::DiscountAndTax);
    }
    Ok(())
}

/// Page size must be at least one.
pub fn validate_page_size(size: u32) -> ValidationResult<()> {
    if size == 0 {
        return Err(ValidationError::InvalidPageSize);
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
