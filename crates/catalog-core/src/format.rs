//! # Display Formatting
//!
//! Pure string renderings used by the response DTOs.
//!
//! ```text
//! Percentage  10      → "10%"          (raw decimal + '%')
//! Money       1234.5  → "R$ 1.234,50"  (pt-BR currency)
//! Money       -5      → "-R$ 5,00"
//! NaiveDate   2024-03-07 → "07/03/2024"
//! ```

use chrono::NaiveDate;

use crate::money::Money;
use crate::types::Percentage;
use crate::CURRENCY_SCALE;

const CURRENCY_SYMBOL: &str = "R$";
const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Raw decimal followed by `%`. The decimal's own scale is kept.
pub fn format_percentage(percentage: &Percentage) -> String {
    format!("{}%", percentage.value())
}

/// Formats an amount as Brazilian Real currency.
///
/// The amount is rounded half-up to two places first.
///
/// ## Example
/// ```rust
/// use catalog_core::format::format_currency;
/// use catalog_core::money::Money;
///
/// assert_eq!(format_currency(&Money::from_cents(123456789)), "R$ 1.234.567,89");
/// assert_eq!(format_currency(&Money::from_cents(5)), "R$ 0,05");
/// ```
pub fn format_currency(money: &Money) -> String {
    let rounded = money.round_half_up().amount();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let mut magnitude = rounded.abs();
    magnitude.rescale(CURRENCY_SCALE);
    let digits = magnitude.to_string();
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }
    out.push_str(CURRENCY_SYMBOL);
    out.push(' ');
    out.push_str(&group_thousands(integer));
    out.push(DECIMAL_SEPARATOR);
    out.push_str(fraction);
    out
}

/// `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(&Percentage::new(dec!(10))), "10%");
        assert_eq!(format_percentage(&Percentage::new(dec!(2.5))), "2.5%");
        assert_eq!(format_percentage(&Percentage::new(dec!(0))), "0%");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(&Money::new(dec!(90))), "R$ 90,00");
        assert_eq!(format_currency(&Money::new(dec!(110.0))), "R$ 110,00");
        assert_eq!(format_currency(&Money::new(dec!(999.999))), "R$ 1.000,00");
        assert_eq!(format_currency(&Money::new(dec!(1234567.8))), "R$ 1.234.567,80");
        assert_eq!(format_currency(&Money::new(dec!(0.125))), "R$ 0,13");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(&Money::new(dec!(-5))), "-R$ 5,00");
        assert_eq!(format_currency(&Money::new(dec!(-1234.5))), "-R$ 1.234,50");
        // Rounds to zero, so no sign
        assert_eq!(format_currency(&Money::new(dec!(-0.001))), "R$ 0,00");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "07/03/2024");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1.234");
        assert_eq!(group_thousands("123456"), "123.456");
        assert_eq!(group_thousands("1234567"), "1.234.567");
    }
}
