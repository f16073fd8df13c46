//! # Domain Types
//!
//! Core domain types used throughout the catalog.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐         ┌─────────────────────┐               │
//! │  │      Product        │  N : 1  │      Category       │               │
//! │  │  ─────────────────  │────────►│  ─────────────────  │               │
//! │  │  id (i64, store)    │         │  id (i64, store)    │               │
//! │  │  name               │         │  name (unique)      │               │
//! │  │  description        │         │  description        │               │
//! │  │  base_price (Money) │         │  tax (Percentage)   │               │
//! │  │  registered_on      │         │  discount (Perc.)   │               │
//! │  └─────────────────────┘         └─────────────────────┘               │
//! │                                                                         │
//! │  ┌─────────────────────┐                                                │
//! │  │    Percentage       │  Decimal, kept at the scale it was entered    │
//! │  │  10    → "10%"      │  (10.50 stays "10.50%")                       │
//! │  └─────────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Identifiers are assigned by the store on first save. An entity that was
//! never saved carries `id: None`.
//!
//! ## Category Invariant
//! At most one of `tax`/`discount` is non-zero. Services enforce this on the
//! incoming request; see [`crate::pricing::PriceAdjustment::for_category`] for
//! how a stored category that breaks it is priced.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

use crate::money::Money;

/// Store-assigned category identifier.
pub type CategoryId = i64;

/// Store-assigned product identifier.
pub type ProductId = i64;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage such as a category tax or discount (`10` = 10%).
///
/// The decimal is kept exactly as it was entered. `Display` renders it raw
/// followed by `%`, without normalising the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percentage(Decimal);

impl Percentage {
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percentage(value)
    }

    #[inline]
    pub const fn zero() -> Self {
        Percentage(Decimal::ZERO)
    }

    /// The raw percentage value (`10` for 10%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for Percentage {
    fn from(value: Decimal) -> Self {
        Percentage(value)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_percentage(self))
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category carrying at most one price adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Option<CategoryId>,

    /// Unique, case-sensitive. Also the lookup key for the HTTP routes.
    pub name: String,

    pub description: String,

    /// Surcharge applied to the base price (≥ 0).
    pub tax: Percentage,

    /// Discount applied to the base price (0..=100).
    pub discount: Percentage,
}

impl Category {
    /// Builds a category that has not been saved yet.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        tax: Percentage,
        discount: Percentage,
    ) -> Self {
        Category {
            id: None,
            name: name.into(),
            description: description.into(),
            tax,
            discount,
        }
    }

    /// True when both adjustments are set, which the rules forbid.
    pub fn has_discount_and_tax(&self) -> bool {
        !self.tax.is_zero() && !self.discount.is_zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// The category is held by value: a loaded product always carries the current
/// state of its category, resolved by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,

    /// Price before the category adjustment. Always > 0.
    pub base_price: Money,

    /// Set once at registration and never updated.
    pub registered_on: NaiveDate,

    pub category: Category,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        base_price: Money,
        registered_on: NaiveDate,
        category: Category,
    ) -> Self {
        Product {
            id: None,
            name: name.into(),
            description: description.into(),
            base_price,
            registered_on,
            category,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percentage_keeps_scale() {
        assert_eq!(Percentage::new(dec!(10)).to_string(), "10%");
        assert_eq!(Percentage::new(dec!(10.50)).to_string(), "10.50%");
        assert_eq!(Percentage::zero().to_string(), "0%");
    }

    #[test]
    fn test_percentage_zero_any_scale() {
        assert!(Percentage::new(dec!(0.00)).is_zero());
        assert!(Percentage::zero().is_zero());
        assert!(!Percentage::new(dec!(0.01)).is_zero());
    }

    #[test]
    fn test_category_discount_and_tax() {
        let both = Category::new(
            "Bebidas",
            "Bebidas em geral",
            Percentage::new(dec!(5)),
            Percentage::new(dec!(10)),
        );
        assert!(both.has_discount_and_tax());
        assert_eq!(both.id, None);

        let one = Category::new("Bebidas", "x", Percentage::zero(), Percentage::new(dec!(10)));
        assert!(!one.has_discount_and_tax());
    }
}
