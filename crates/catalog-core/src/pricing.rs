//! # Pricing
//!
//! Final price of a product from its base price and its category's adjustment.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Pick the adjustment                                                 │
//! │       discount ≠ 0  → A = -discount                                     │
//! │       else tax ≠ 0  → A = +tax                                          │
//! │       else          → A = 0                                             │
//! │                                                                         │
//! │  2. factor = 1 + round(A / 100, 2)        (half-up)                     │
//! │                                                                         │
//! │  3. final  = round(base × factor, 2)      (half-up)                     │
//! │                                                                         │
//! │  base 100, discount 10  → factor 0.90 → 90.00                           │
//! │  base 100, tax 10       → factor 1.10 → 110.00                          │
//! │  base 100, discount 12.5→ factor 0.87 → 87.00  (0.125 rounds to 0.13)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The factor is rounded before multiplying, so fractional percentages lose
//! precision beyond two places of the fraction.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Category, Percentage};
use crate::validation::ValidationResult;
use crate::CURRENCY_SCALE;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// The single adjustment a category applies to a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceAdjustment {
    Discount(Percentage),
    Surcharge(Percentage),
    None,
}

impl PriceAdjustment {
    /// Selects the adjustment of a category. Discount wins when both are set.
    pub fn for_category(category: &Category) -> Self {
        if !category.discount.is_zero() {
            PriceAdjustment::Discount(category.discount)
        } else if !category.tax.is_zero() {
            PriceAdjustment::Surcharge(category.tax)
        } else {
            PriceAdjustment::None
        }
    }

    /// The signed percentage: negative for a discount.
    pub fn signed_percentage(&self) -> Decimal {
        match self {
            PriceAdjustment::Discount(p) => -p.value(),
            PriceAdjustment::Surcharge(p) => p.value(),
            PriceAdjustment::None => Decimal::ZERO,
        }
    }

    /// `1 + round(A / 100, 2)`.
    pub fn factor(&self) -> Decimal {
        let fraction = (self.signed_percentage() / ONE_HUNDRED)
            .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        Decimal::ONE + fraction
    }
}

/// Applies an adjustment to a base price and rounds half-up to two places.
///
/// ## Errors
/// [`ValidationError::PriceOutOfRange`] when the multiplication overflows.
pub fn final_price(base_price: Money, adjustment: PriceAdjustment) -> ValidationResult<Money> {
    base_price
        .checked_mul(adjustment.factor())
        .map(|price| price.round_half_up())
        .ok_or(ValidationError::PriceOutOfRange)
}

/// Final price of a base price under a category's adjustment.
pub fn final_price_for(base_price: Money, category: &Category) -> ValidationResult<Money> {
    final_price(base_price, PriceAdjustment::for_category(category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn category(tax: Decimal, discount: Decimal) -> Category {
        Category::new("Cat", "Desc", Percentage::new(tax), Percentage::new(discount))
    }

    #[test]
    fn test_adjustment_selection() {
        assert_eq!(
            PriceAdjustment::for_category(&category(dec!(0), dec!(10))),
            PriceAdjustment::Discount(Percentage::new(dec!(10)))
        );
        assert_eq!(
            PriceAdjustment::for_category(&category(dec!(10), dec!(0))),
            PriceAdjustment::Surcharge(Percentage::new(dec!(10)))
        );
        assert_eq!(
            PriceAdjustment::for_category(&category(dec!(0), dec!(0))),
            PriceAdjustment::None
        );
    }

    #[test]
    fn test_discount_wins_over_tax() {
        let both = category(dec!(20), dec!(10));
        assert_eq!(final_price_for(Money::new(dec!(100)), &both).unwrap().amount(), dec!(90));
    }

    #[test]
    fn test_basic_final_prices() {
        let base = Money::new(dec!(100));
        let discount = final_price_for(base, &category(dec!(0), dec!(10))).unwrap();
        let tax = final_price_for(base, &category(dec!(10), dec!(0))).unwrap();
        let none = final_price_for(base, &category(dec!(0), dec!(0))).unwrap();

        assert_eq!(discount.to_string(), "R$ 90,00");
        assert_eq!(tax.to_string(), "R$ 110,00");
        assert_eq!(none.to_string(), "R$ 100,00");
    }

    #[test]
    fn test_factor_is_rounded_before_multiplying() {
        // 12.5% → 0.125 → 0.13, so factor 0.87
        let adjustment = PriceAdjustment::Discount(Percentage::new(dec!(12.5)));
        assert_eq!(adjustment.factor(), dec!(0.87));
        assert_eq!(
            final_price(Money::new(dec!(100)), adjustment).unwrap().amount(),
            dec!(87.00)
        );

        // 0.4% rounds to 0.00, so no change at all
        let tiny = PriceAdjustment::Surcharge(Percentage::new(dec!(0.4)));
        assert_eq!(tiny.factor(), dec!(1));
    }

    #[test]
    fn test_final_price_rounds_half_up() {
        // 19.99 × 0.90 = 17.991
        let discount = PriceAdjustment::Discount(Percentage::new(dec!(10)));
        assert_eq!(
            final_price(Money::new(dec!(19.99)), discount).unwrap().amount(),
            dec!(17.99)
        );

        // 10.05 × 1.05 = 10.5525 → 10.55
        let tax = PriceAdjustment::Surcharge(Percentage::new(dec!(5)));
        assert_eq!(final_price(Money::new(dec!(10.05)), tax).unwrap().amount(), dec!(10.55));

        // 0.05 × 0.90 = 0.045 → 0.05
        assert_eq!(
            final_price(Money::new(dec!(0.05)), discount).unwrap().amount(),
            dec!(0.05)
        );
    }

    #[test]
    fn test_full_discount() {
        let free = PriceAdjustment::Discount(Percentage::new(dec!(100)));
        assert!(final_price(Money::new(dec!(42.50)), free).unwrap().is_zero());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let tax = PriceAdjustment::Surcharge(Percentage::new(dec!(500)));
        assert!(matches!(
            final_price(Money::new(Decimal::MAX), tax),
            Err(ValidationError::PriceOutOfRange)
        ));
    }
}
