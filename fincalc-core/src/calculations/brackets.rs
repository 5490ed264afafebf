//! Progressive bracket application.
//!
//! The income-tax schedule is an ordered list of widths. Taxable income
//! fills each width in turn at that bracket's rate until nothing remains;
//! the open-ended last bracket absorbs whatever is left.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::TaxBracket;
//! use fincalc_core::calculations::brackets::apply_brackets;
//!
//! let brackets = vec![
//!     TaxBracket::bounded(dec!(40000), dec!(0)),
//!     TaxBracket::bounded(dec!(15000), dec!(0.10)),
//!     TaxBracket::unbounded(dec!(0.15)),
//! ];
//!
//! let breakdown = apply_brackets(dec!(60000), &brackets);
//!
//! // 15000 × 10% + 5000 × 15%
//! assert_eq!(breakdown.total_tax, dec!(2250));
//! assert_eq!(breakdown.slices.len(), 3);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{max, percent};
use crate::models::{CalculationStep, TaxBracket, TaxTable};

/// The part of taxable income that fell into one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    /// One-based position of the bracket in the schedule.
    pub position: usize,
    pub taxable: Decimal,
    pub rate: Decimal,
    pub tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketBreakdown {
    pub slices: Vec<BracketSlice>,
    pub total_tax: Decimal,
}

impl BracketBreakdown {
    /// Total income consumed across all touched brackets.
    pub fn taxed_income(&self) -> Decimal {
        self.slices.iter().map(|s| s.taxable).sum()
    }

    /// Appends one step per touched bracket, in schedule order.
    pub fn push_steps(
        &self,
        steps: &mut Vec<CalculationStep>,
    ) {
        for slice in &self.slices {
            steps.push(CalculationStep::new(
                format!(
                    "Bracket {}: {} at {}%",
                    slice.position,
                    slice.taxable,
                    percent(slice.rate)
                ),
                slice.tax,
            ));
        }
    }
}

/// Walks `brackets` in order, taxing each slice at its own rate.
///
/// Stops as soon as the remaining income reaches zero, so zero income
/// touches no bracket. A zero-rate bracket that receives income is still
/// reported as a slice.
pub fn apply_brackets(
    taxable_income: Decimal,
    brackets: &[TaxBracket],
) -> BracketBreakdown {
    let mut remaining = max(taxable_income, Decimal::ZERO);
    let mut slices = Vec::new();
    let mut total_tax = Decimal::ZERO;

    for (index, bracket) in brackets.iter().enumerate() {
        if remaining <= Decimal::ZERO {
            break;
        }
        let taxable = match bracket.width {
            Some(width) => remaining.min(width),
            None => remaining,
        };
        let tax = taxable * bracket.rate;

        total_tax += tax;
        remaining -= taxable;
        slices.push(BracketSlice {
            position: index + 1,
            taxable,
            rate: bracket.rate,
            tax,
        });
    }

    BracketBreakdown { slices, total_tax }
}

/// Income left after the personal exemption, never negative.
pub fn taxable_after_exemption(
    income: Decimal,
    table: &TaxTable,
) -> Decimal {
    max(income - table.personal_exemption, Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::rates::RateTables;

    fn schedule_2024() -> Vec<TaxBracket> {
        RateTables::builtin().lookup(2024).income_tax.brackets.clone()
    }

    #[test]
    fn zero_income_touches_no_bracket() {
        let breakdown = apply_brackets(Decimal::ZERO, &schedule_2024());

        assert!(breakdown.slices.is_empty());
        assert_eq!(breakdown.total_tax, Decimal::ZERO);
    }

    #[test]
    fn negative_income_is_treated_as_zero() {
        let breakdown = apply_brackets(dec!(-500), &schedule_2024());

        assert!(breakdown.slices.is_empty());
    }

    #[test]
    fn income_inside_zero_bracket_records_zero_rate_step() {
        let breakdown = apply_brackets(dec!(30000), &schedule_2024());

        assert_eq!(
            breakdown.slices,
            vec![BracketSlice {
                position: 1,
                taxable: dec!(30000),
                rate: dec!(0),
                tax: dec!(0),
            }]
        );
    }

    #[test]
    fn income_spanning_three_brackets() {
        let breakdown = apply_brackets(dec!(60000), &schedule_2024());

        // 40000 × 0 + 15000 × 10% + 5000 × 15%
        assert_eq!(breakdown.slices.len(), 3);
        assert_eq!(breakdown.slices[2].taxable, dec!(5000));
        assert_eq!(breakdown.total_tax, dec!(2250));
    }

    #[test]
    fn income_reaching_top_bracket() {
        let breakdown = apply_brackets(dec!(1500000), &schedule_2024());

        // 0 + 1500 + 2250 + 26000 + 45000 + 200000 + 300000 × 27.5%
        assert_eq!(breakdown.slices.len(), 7);
        assert_eq!(breakdown.slices[6].taxable, dec!(300000));
        assert_eq!(breakdown.total_tax, dec!(357250));
    }

    #[test]
    fn income_exactly_filling_a_bracket_stops_there() {
        let breakdown = apply_brackets(dec!(55000), &schedule_2024());

        assert_eq!(breakdown.slices.len(), 2);
        assert_eq!(breakdown.total_tax, dec!(1500));
    }

    #[test]
    fn push_steps_emits_one_step_per_slice() {
        let breakdown = apply_brackets(dec!(60000), &schedule_2024());
        let mut steps = Vec::new();

        breakdown.push_steps(&mut steps);

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].description, "Bracket 2: 15000 at 10%");
        assert_eq!(steps[1].value(), Some(dec!(1500)));
    }

    #[test]
    fn taxable_after_exemption_floors_at_zero() {
        let table = RateTables::builtin().lookup(2024).income_tax.clone();

        assert_eq!(taxable_after_exemption(dec!(15000), &table), Decimal::ZERO);
        assert_eq!(taxable_after_exemption(dec!(25000), &table), dec!(5000));
    }

    proptest! {
        #[test]
        fn prop_slices_cover_all_income(income in 0u64..5_000_000u64, year in 2022i32..2026) {
            let income = Decimal::from(income);
            let brackets = RateTables::builtin().lookup(year).income_tax.brackets.clone();

            let breakdown = apply_brackets(income, &brackets);

            prop_assert_eq!(breakdown.taxed_income(), income);
        }

        #[test]
        fn prop_total_is_sum_of_slice_taxes(income in 0u64..5_000_000u64) {
            let breakdown = apply_brackets(Decimal::from(income), &schedule_2024());

            let expected: Decimal = breakdown
                .slices
                .iter()
                .map(|s| s.taxable * s.rate)
                .sum();

            prop_assert_eq!(breakdown.total_tax, expected);
        }

        #[test]
        fn prop_bounded_schedule_caps_taxed_income(income in 0u64..100_000u64) {
            let brackets = vec![
                TaxBracket::bounded(dec!(10000), dec!(0.1)),
                TaxBracket::bounded(dec!(20000), dec!(0.2)),
            ];
            let income = Decimal::from(income);

            let breakdown = apply_brackets(income, &brackets);

            prop_assert_eq!(breakdown.taxed_income(), income.min(dec!(30000)));
        }
    }
}
