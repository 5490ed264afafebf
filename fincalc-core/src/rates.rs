//! Year-keyed rate tables.
//!
//! The built-in tables cover 2022 through 2025. Lookups for any other year
//! resolve to [`FALLBACK_YEAR`]; an unknown year is never an error.
//!
//! | Year | Personal exemption | Insurance wage (monthly) |
//! |------|--------------------|--------------------------|
//! | 2022 | 9,000              | 1,400 .. 9,400           |
//! | 2023 | 15,000             | 1,700 .. 10,900          |
//! | 2024 | 20,000             | 2,000 .. 12,600          |
//! | 2025 | 20,000             | 2,300 .. 14,500          |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::rates::RateTables;
//!
//! let tables = RateTables::builtin();
//!
//! assert_eq!(tables.resolve_year(2023), 2023);
//! assert_eq!(tables.resolve_year(1990), 2024);
//! assert_eq!(tables.lookup(1990).income_tax.personal_exemption, dec!(20000));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    ElectricityBracket, ElectricityTariff, ElectricityTariffs, InsuranceParams, TaxBracket,
    TaxTable, YearRates,
};

/// Year used when a requested year has no table of its own.
pub const FALLBACK_YEAR: i32 = 2024;

/// Errors raised when validating or assembling rate tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    #[error("no rate tables defined")]
    Empty,

    #[error("fallback year {0} has no rate table")]
    MissingFallbackYear(i32),

    #[error("{table} table for {year} has no brackets")]
    NoBrackets { year: i32, table: &'static str },

    #[error("{table} table for {year}: rate {rate} is outside 0..=1")]
    InvalidRate {
        year: i32,
        table: &'static str,
        rate: Decimal,
    },

    #[error("{table} table for {year}: only the last bracket may be unbounded")]
    MisplacedUnboundedBracket { year: i32, table: &'static str },

    #[error("{table} table for {year}: last bracket must be unbounded")]
    MissingUnboundedBracket { year: i32, table: &'static str },

    #[error("{table} table for {year}: bracket bounds must be positive and increasing")]
    NonIncreasingBound { year: i32, table: &'static str },

    #[error("{table} table for {year}: negative amount {amount}")]
    NegativeAmount {
        year: i32,
        table: &'static str,
        amount: Decimal,
    },
}

/// The rate tables consulted by every calculator.
///
/// Always holds an entry for its fallback year; construct through
/// [`RateTables::new`] or [`RateTables::builtin`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateTables {
    years: BTreeMap<i32, YearRates>,
    fallback_year: i32,
}

impl RateTables {
    /// Builds tables from explicit entries.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableError`] if `years` is empty, lacks the fallback
    /// year, or any entry fails [`RateTables::validate`].
    pub fn new(
        years: BTreeMap<i32, YearRates>,
        fallback_year: i32,
    ) -> Result<Self, RateTableError> {
        let tables = Self {
            years,
            fallback_year,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// The tables shipped with the crate.
    pub fn builtin() -> Self {
        let mut years = BTreeMap::new();
        years.insert(
            2022,
            YearRates {
                income_tax: income_tax_2022(),
                insurance: insurance(dec!(1400), dec!(9400)),
                electricity: electricity_tariffs(),
            },
        );
        years.insert(
            2023,
            YearRates {
                income_tax: income_tax_2023_onward(dec!(15000)),
                insurance: insurance(dec!(1700), dec!(10900)),
                electricity: electricity_tariffs(),
            },
        );
        years.insert(
            2024,
            YearRates {
                income_tax: income_tax_2023_onward(dec!(20000)),
                insurance: insurance(dec!(2000), dec!(12600)),
                electricity: electricity_tariffs(),
            },
        );
        years.insert(
            2025,
            YearRates {
                income_tax: income_tax_2023_onward(dec!(20000)),
                insurance: insurance(dec!(2300), dec!(14500)),
                electricity: electricity_tariffs(),
            },
        );

        Self {
            years,
            fallback_year: FALLBACK_YEAR,
        }
    }

    pub fn fallback_year(&self) -> i32 {
        self.fallback_year
    }

    /// Years that have their own table, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }

    /// Returns `year` if it has a table, otherwise the fallback year.
    pub fn resolve_year(
        &self,
        year: i32,
    ) -> i32 {
        if self.years.contains_key(&year) {
            year
        } else {
            debug!(
                requested = year,
                fallback = self.fallback_year,
                "no rate table for year; using fallback"
            );
            self.fallback_year
        }
    }

    /// Returns the tables for `year`, falling back when it is absent.
    pub fn lookup(
        &self,
        year: i32,
    ) -> &YearRates {
        let resolved = self.resolve_year(year);
        // `new` and `builtin` both guarantee the fallback entry exists.
        self.years
            .get(&resolved)
            .or_else(|| self.years.values().next_back())
            .unwrap_or_else(|| unreachable!("rate tables always hold the fallback year"))
    }

    /// Replaces the income-tax table for `year`.
    ///
    /// A year that had no entry inherits its insurance and electricity
    /// tables from the fallback year.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableError`] if the new table is invalid.
    pub fn with_income_tax(
        mut self,
        year: i32,
        table: TaxTable,
    ) -> Result<Self, RateTableError> {
        validate_tax_table(year, &table)?;
        match self.years.get_mut(&year) {
            Some(entry) => entry.income_tax = table,
            None => {
                let base = self.lookup(self.fallback_year).clone();
                self.years.insert(
                    year,
                    YearRates {
                        income_tax: table,
                        ..base
                    },
                );
            }
        }
        Ok(self)
    }

    /// Checks the structural invariants every bracket walk relies on.
    ///
    /// # Errors
    ///
    /// Returns the first [`RateTableError`] found.
    pub fn validate(&self) -> Result<(), RateTableError> {
        if self.years.is_empty() {
            return Err(RateTableError::Empty);
        }
        if !self.years.contains_key(&self.fallback_year) {
            return Err(RateTableError::MissingFallbackYear(self.fallback_year));
        }
        for (&year, rates) in &self.years {
            validate_tax_table(year, &rates.income_tax)?;
            validate_insurance(year, &rates.insurance)?;
            validate_tariff(year, "residential electricity", &rates.electricity.residential)?;
            validate_tariff(year, "commercial electricity", &rates.electricity.commercial)?;
        }
        Ok(())
    }
}

impl Default for RateTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_rate(
    year: i32,
    table: &'static str,
    rate: Decimal,
) -> Result<(), RateTableError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(RateTableError::InvalidRate { year, table, rate });
    }
    Ok(())
}

/// Validates a single income-tax table.
///
/// # Errors
///
/// Returns [`RateTableError`] on an empty schedule, a rate outside
/// `0..=1`, a non-positive width, or a missing or misplaced open-ended
/// bracket.
pub fn validate_tax_table(
    year: i32,
    table: &TaxTable,
) -> Result<(), RateTableError> {
    const NAME: &str = "income tax";

    if table.personal_exemption < Decimal::ZERO {
        return Err(RateTableError::NegativeAmount {
            year,
            table: NAME,
            amount: table.personal_exemption,
        });
    }
    let Some((last, rest)) = table.brackets.split_last() else {
        return Err(RateTableError::NoBrackets { year, table: NAME });
    };
    for bracket in rest {
        validate_rate(year, NAME, bracket.rate)?;
        match bracket.width {
            None => {
                return Err(RateTableError::MisplacedUnboundedBracket { year, table: NAME });
            }
            Some(w) if w <= Decimal::ZERO => {
                return Err(RateTableError::NonIncreasingBound { year, table: NAME });
            }
            Some(_) => {}
        }
    }
    validate_rate(year, NAME, last.rate)?;
    if last.width.is_some() {
        return Err(RateTableError::MissingUnboundedBracket { year, table: NAME });
    }
    Ok(())
}

fn validate_insurance(
    year: i32,
    params: &InsuranceParams,
) -> Result<(), RateTableError> {
    const NAME: &str = "insurance";

    validate_rate(year, NAME, params.employee_rate)?;
    validate_rate(year, NAME, params.employer_rate)?;
    if params.min_wage < Decimal::ZERO {
        return Err(RateTableError::NegativeAmount {
            year,
            table: NAME,
            amount: params.min_wage,
        });
    }
    if params.max_wage < params.min_wage {
        return Err(RateTableError::NonIncreasingBound { year, table: NAME });
    }
    Ok(())
}

fn validate_tariff(
    year: i32,
    name: &'static str,
    tariff: &ElectricityTariff,
) -> Result<(), RateTableError> {
    if tariff.service_fee < Decimal::ZERO {
        return Err(RateTableError::NegativeAmount {
            year,
            table: name,
            amount: tariff.service_fee,
        });
    }
    let Some((last, rest)) = tariff.brackets.split_last() else {
        return Err(RateTableError::NoBrackets { year, table: name });
    };
    let mut previous = Decimal::ZERO;
    for bracket in rest {
        match bracket.limit {
            None => {
                return Err(RateTableError::MisplacedUnboundedBracket { year, table: name });
            }
            Some(limit) if limit <= previous => {
                return Err(RateTableError::NonIncreasingBound { year, table: name });
            }
            Some(limit) => previous = limit,
        }
        if bracket.rate < Decimal::ZERO {
            return Err(RateTableError::NegativeAmount {
                year,
                table: name,
                amount: bracket.rate,
            });
        }
    }
    if last.limit.is_some() {
        return Err(RateTableError::MissingUnboundedBracket { year, table: name });
    }
    Ok(())
}

// ── built-in data ────────────────────────────────────────────────────────

fn income_tax_2022() -> TaxTable {
    TaxTable {
        personal_exemption: dec!(9000),
        brackets: vec![
            TaxBracket::bounded(dec!(15000), dec!(0)),
            TaxBracket::bounded(dec!(15000), dec!(0.025)),
            TaxBracket::bounded(dec!(15000), dec!(0.10)),
            TaxBracket::bounded(dec!(15000), dec!(0.15)),
            TaxBracket::bounded(dec!(140000), dec!(0.20)),
            TaxBracket::bounded(dec!(200000), dec!(0.225)),
            TaxBracket::unbounded(dec!(0.25)),
        ],
    }
}

fn income_tax_2023_onward(personal_exemption: Decimal) -> TaxTable {
    TaxTable {
        personal_exemption,
        brackets: vec![
            TaxBracket::bounded(dec!(40000), dec!(0)),
            TaxBracket::bounded(dec!(15000), dec!(0.10)),
            TaxBracket::bounded(dec!(15000), dec!(0.15)),
            TaxBracket::bounded(dec!(130000), dec!(0.20)),
            TaxBracket::bounded(dec!(200000), dec!(0.225)),
            TaxBracket::bounded(dec!(800000), dec!(0.25)),
            TaxBracket::unbounded(dec!(0.275)),
        ],
    }
}

fn insurance(
    min_wage: Decimal,
    max_wage: Decimal,
) -> InsuranceParams {
    InsuranceParams {
        min_wage,
        max_wage,
        employee_rate: dec!(0.11),
        employer_rate: dec!(0.1875),
    }
}

fn tier(
    limit: Decimal,
    rate: Decimal,
) -> ElectricityBracket {
    ElectricityBracket {
        limit: Some(limit),
        rate,
    }
}

fn electricity_tariffs() -> ElectricityTariffs {
    ElectricityTariffs {
        residential: ElectricityTariff {
            brackets: vec![
                tier(dec!(50), dec!(0.68)),
                tier(dec!(100), dec!(0.78)),
                tier(dec!(200), dec!(0.95)),
                tier(dec!(350), dec!(1.55)),
                tier(dec!(650), dec!(1.95)),
                tier(dec!(1000), dec!(2.10)),
                ElectricityBracket {
                    limit: None,
                    rate: dec!(2.23),
                },
            ],
            service_fee: dec!(10),
        },
        commercial: ElectricityTariff {
            brackets: vec![
                tier(dec!(100), dec!(0.85)),
                tier(dec!(250), dec!(1.68)),
                tier(dec!(600), dec!(1.83)),
                tier(dec!(1000), dec!(2.08)),
                ElectricityBracket {
                    limit: None,
                    rate: dec!(2.33),
                },
            ],
            service_fee: dec!(20),
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builtin_tables_are_valid() {
        assert_eq!(RateTables::builtin().validate(), Ok(()));
    }

    #[test]
    fn builtin_years_are_sorted() {
        assert_eq!(RateTables::builtin().years(), vec![2022, 2023, 2024, 2025]);
    }

    #[test]
    fn resolve_year_keeps_known_year() {
        assert_eq!(RateTables::builtin().resolve_year(2022), 2022);
    }

    #[test]
    fn resolve_year_falls_back_for_unknown_year() {
        let tables = RateTables::builtin();

        assert_eq!(tables.resolve_year(2030), FALLBACK_YEAR);
        assert_eq!(tables.resolve_year(1999), FALLBACK_YEAR);
    }

    #[test]
    fn lookup_unknown_year_returns_fallback_entry() {
        let tables = RateTables::builtin();

        assert_eq!(tables.lookup(2040), tables.lookup(FALLBACK_YEAR));
    }

    #[test]
    fn lookup_returns_year_specific_insurance() {
        let tables = RateTables::builtin();

        assert_eq!(tables.lookup(2023).insurance.max_wage, dec!(10900));
        assert_eq!(tables.lookup(2025).insurance.min_wage, dec!(2300));
    }

    #[test]
    fn every_builtin_schedule_ends_unbounded() {
        let tables = RateTables::builtin();
        for year in tables.years() {
            let rates = tables.lookup(year);
            assert_eq!(rates.income_tax.capacity(), None);
            assert!(rates.income_tax.brackets.last().unwrap().width.is_none());
            assert!(
                rates
                    .electricity
                    .residential
                    .brackets
                    .last()
                    .unwrap()
                    .limit
                    .is_none()
            );
        }
    }

    #[test]
    fn new_rejects_missing_fallback_year() {
        let mut years = BTreeMap::new();
        years.insert(2023, RateTables::builtin().lookup(2023).clone());

        assert_eq!(
            RateTables::new(years, 2024),
            Err(RateTableError::MissingFallbackYear(2024))
        );
    }

    #[test]
    fn new_rejects_empty_tables() {
        assert_eq!(
            RateTables::new(BTreeMap::new(), 2024),
            Err(RateTableError::Empty)
        );
    }

    #[test]
    fn validate_tax_table_rejects_bounded_last_bracket() {
        let table = TaxTable {
            personal_exemption: dec!(0),
            brackets: vec![TaxBracket::bounded(dec!(1000), dec!(0.1))],
        };

        assert_eq!(
            validate_tax_table(2024, &table),
            Err(RateTableError::MissingUnboundedBracket {
                year: 2024,
                table: "income tax"
            })
        );
    }

    #[test]
    fn validate_tax_table_rejects_unbounded_middle_bracket() {
        let table = TaxTable {
            personal_exemption: dec!(0),
            brackets: vec![
                TaxBracket::unbounded(dec!(0.1)),
                TaxBracket::unbounded(dec!(0.2)),
            ],
        };

        assert_eq!(
            validate_tax_table(2024, &table),
            Err(RateTableError::MisplacedUnboundedBracket {
                year: 2024,
                table: "income tax"
            })
        );
    }

    #[test]
    fn validate_tax_table_rejects_rate_above_one() {
        let table = TaxTable {
            personal_exemption: dec!(0),
            brackets: vec![TaxBracket::unbounded(dec!(1.5))],
        };

        assert_eq!(
            validate_tax_table(2024, &table),
            Err(RateTableError::InvalidRate {
                year: 2024,
                table: "income tax",
                rate: dec!(1.5)
            })
        );
    }

    #[test]
    fn validate_tax_table_rejects_empty_schedule() {
        let table = TaxTable {
            personal_exemption: dec!(0),
            brackets: vec![],
        };

        assert_eq!(
            validate_tax_table(2024, &table),
            Err(RateTableError::NoBrackets {
                year: 2024,
                table: "income tax"
            })
        );
    }

    #[test]
    fn with_income_tax_replaces_existing_year() {
        let table = TaxTable {
            personal_exemption: dec!(1),
            brackets: vec![TaxBracket::unbounded(dec!(0.1))],
        };

        let tables = RateTables::builtin()
            .with_income_tax(2023, table.clone())
            .unwrap();

        assert_eq!(tables.lookup(2023).income_tax, table);
        assert_eq!(tables.lookup(2023).insurance.max_wage, dec!(10900));
    }

    #[test]
    fn with_income_tax_new_year_inherits_fallback_insurance() {
        let table = TaxTable {
            personal_exemption: dec!(30000),
            brackets: vec![TaxBracket::unbounded(dec!(0.2))],
        };

        let tables = RateTables::builtin()
            .with_income_tax(2026, table.clone())
            .unwrap();

        assert_eq!(tables.resolve_year(2026), 2026);
        assert_eq!(tables.lookup(2026).income_tax, table);
        assert_eq!(
            tables.lookup(2026).insurance,
            tables.lookup(FALLBACK_YEAR).insurance
        );
    }

    #[test]
    fn with_income_tax_rejects_invalid_table() {
        let table = TaxTable {
            personal_exemption: dec!(0),
            brackets: vec![],
        };

        assert!(RateTables::builtin().with_income_tax(2026, table).is_err());
    }
}
