//! Common utility functions for the calculators.
//!
//! This module provides shared functionality used across multiple
//! calculators, including rounding, compounding and summary formatting.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Months in a year, used wherever a monthly figure is annualized.
pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Computes `(1 + rate)^periods` by repeated multiplication, or `None`
/// once the product leaves the `Decimal` range.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::checked_compound;
///
/// assert_eq!(checked_compound(dec!(0.10), 2), Some(dec!(1.21)));
/// assert_eq!(checked_compound(dec!(0.05), 0), Some(dec!(1)));
/// assert_eq!(checked_compound(dec!(1.5), 600), None);
/// ```
pub fn checked_compound(
    rate: Decimal,
    periods: u32,
) -> Option<Decimal> {
    let factor = Decimal::ONE.checked_add(rate)?;
    let mut result = Decimal::ONE;
    for _ in 0..periods {
        result = result.checked_mul(factor)?;
    }
    Some(result)
}

/// Converts a fractional rate to a percentage figure (`0.225` → `22.5`).
pub fn percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

/// Formats an amount for a summary sentence, e.g. `"1400.00 EGP"`.
pub fn money(value: Decimal) -> String {
    format!("{:.2} EGP", round_half_up(value))
}

/// Owned copies of a calculator's law citations, in citation order.
pub fn laws(citations: &[&str]) -> Vec<String> {
    citations.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        assert_eq!(round_half_up(dec!(999999.999)), dec!(1000000.00));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
    }

    #[test]
    fn max_handles_equal_values() {
        assert_eq!(max(dec!(150.00), dec!(150.00)), dec!(150.00));
    }

    #[test]
    fn max_handles_negative_and_positive() {
        assert_eq!(max(dec!(-50.00), dec!(50.00)), dec!(50.00));
    }

    // =========================================================================
    // compound tests
    // =========================================================================

    #[test]
    fn compound_zero_periods_is_one() {
        assert_eq!(checked_compound(dec!(0.01), 0), Some(Decimal::ONE));
    }

    #[test]
    fn compound_zero_rate_is_one() {
        assert_eq!(checked_compound(Decimal::ZERO, 360), Some(Decimal::ONE));
    }

    #[test]
    fn compound_monthly_rate_for_one_year() {
        // 1.01^12 = 1.126825030131969720661201
        assert_eq!(checked_compound(dec!(0.01), 12).map(round_half_up), Some(dec!(1.13)));
    }

    #[test]
    fn compound_out_of_range_is_none() {
        // 1.01^7200 is far beyond Decimal::MAX (about 7.9e28).
        assert_eq!(checked_compound(dec!(0.01), 7200), None);
        assert_eq!(checked_compound(Decimal::MAX, 1), None);
    }

    // =========================================================================
    // formatting tests
    // =========================================================================

    #[test]
    fn percent_normalizes_trailing_zeros() {
        assert_eq!(percent(dec!(0.225)).to_string(), "22.5");
        assert_eq!(percent(dec!(0.10)).to_string(), "10");
    }

    #[test]
    fn money_always_shows_two_places() {
        assert_eq!(money(dec!(840)), "840.00 EGP");
        assert_eq!(money(dec!(6375.025)), "6375.03 EGP");
    }
}
