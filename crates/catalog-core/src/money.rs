//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Prices here are multiplied by percentage factors (0.90, 1.10, ...)    │
//! │  and rounded half-up, so the arithmetic must be exact base-10.         │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal::Decimal                                    │
//! │    19.99 × 0.90 = 17.991 → round half-up → 17.99                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::money::Money;
//! use rust_decimal_macros::dec;
//!
//! let price = Money::from_cents(1999); // R$ 19,99
//! let discounted = price.checked_mul(dec!(0.90)).unwrap().round_half_up();
//! assert_eq!(discounted.to_string(), "R$ 17,99");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

use crate::CURRENCY_SCALE;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in Brazilian Reais.
///
/// ## Design Decisions
/// - **Decimal, not cents**: base prices arrive with arbitrary scale and the
///   final price is a product of decimals, so the value is kept exact and only
///   rounded where the pricing rule says so
/// - **Scale preserved**: `Money::new(dec!(10.5))` keeps scale 1 until rounded
///
/// ## Where Money is Used
/// ```text
/// Product.base_price ──► pricing::final_price ──► Money (rounded, 2 places)
///                                                     │
///                                                     ▼
///                                          "R$ 1.234,56" via Display
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.amount().to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, CURRENCY_SCALE))
    }

    /// The exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Rounds to two decimal places, ties away from zero (half-up).
    ///
    /// ```text
    /// 10.005 → 10.01
    /// 10.004 → 10.00
    /// -5.005 → -5.01
    /// ```
    pub fn round_half_up(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiplies by a decimal factor, returning `None` on overflow.
    ///
    /// The result is NOT rounded.
    pub fn checked_mul(&self, factor: Decimal) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display renders Brazilian Real currency: `R$ 1.234,56`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_currency(self))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
