//! Social insurance: contribution wage clamping and the three benefit
//! calculations (monthly contributions, pension, lump sum).
//!
//! | Mode           | Formula                                              |
//! |----------------|------------------------------------------------------|
//! | `contribution` | clamp(basic + variable) × employee / employer rate   |
//! | `pension`      | average wage × min(years, 36) / 45                   |
//! | `lump_sum`     | average wage × 12 × 15% × years                      |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{MONTHS_PER_YEAR, laws, money, percent};
use crate::models::{CalculationStep, InsuranceParams, Report};
use crate::rates::RateTables;

/// Contribution years beyond this cap do not increase the pension.
pub const PENSION_YEARS_CAP: Decimal = dec!(36);
/// Divisor of the capped years-of-service pension formula.
pub const PENSION_DIVISOR: Decimal = dec!(45);
/// Share of annual wage paid per contribution year as a lump sum.
pub const LUMP_SUM_FACTOR: Decimal = dec!(0.15);

const LAWS: &[&str] = &["Social Insurance and Pensions Law No. 148 of 2019"];

/// Clamps a monthly wage into the insurable range `[min_wage, max_wage]`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::insurance::contribution_wage;
/// use fincalc_core::rates::RateTables;
///
/// let tables = RateTables::builtin();
/// let params = &tables.lookup(2024).insurance;
///
/// assert_eq!(contribution_wage(dec!(500), params), dec!(2000));
/// assert_eq!(contribution_wage(dec!(8000), params), dec!(8000));
/// assert_eq!(contribution_wage(dec!(50000), params), dec!(12600));
/// ```
pub fn contribution_wage(
    monthly_wage: Decimal,
    params: &InsuranceParams,
) -> Decimal {
    params.min_wage.max(monthly_wage.min(params.max_wage))
}

/// Employee and employer monthly contributions on a clamped wage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributions {
    pub contribution_wage: Decimal,
    pub employee: Decimal,
    pub employer: Decimal,
}

impl Contributions {
    pub fn for_wage(
        monthly_wage: Decimal,
        params: &InsuranceParams,
    ) -> Self {
        let contribution_wage = contribution_wage(monthly_wage, params);
        Self {
            contribution_wage,
            employee: contribution_wage * params.employee_rate,
            employer: contribution_wage * params.employer_rate,
        }
    }
}

/// Parameters for the social insurance calculator, one variant per mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "calculation_type", rename_all = "snake_case")]
pub enum SocialInsuranceParams {
    Contribution {
        basic_wage: Decimal,
        #[serde(default)]
        variable_wage: Decimal,
        year: i32,
    },
    Pension {
        average_wage: Decimal,
        contribution_years: Decimal,
    },
    LumpSum {
        average_wage: Decimal,
        contribution_years: Decimal,
    },
}

/// Computes the requested social insurance figure.
///
/// Report mapping:
/// - `contribution`: gross = monthly wage, insurance = employee share,
///   net = wage − employee share.
/// - `pension` / `lump_sum`: the benefit goes in `net_income`; gross, tax
///   and insurance stay zero.
pub fn social_insurance(
    params: &SocialInsuranceParams,
    rates: &RateTables,
) -> Report {
    match params {
        SocialInsuranceParams::Contribution {
            basic_wage,
            variable_wage,
            year,
        } => contribution(*basic_wage, *variable_wage, *year, rates),
        SocialInsuranceParams::Pension {
            average_wage,
            contribution_years,
        } => pension(*average_wage, *contribution_years),
        SocialInsuranceParams::LumpSum {
            average_wage,
            contribution_years,
        } => lump_sum(*average_wage, *contribution_years),
    }
}

fn contribution(
    basic_wage: Decimal,
    variable_wage: Decimal,
    year: i32,
    rates: &RateTables,
) -> Report {
    let params = &rates.lookup(year).insurance;
    let wage = basic_wage + variable_wage;
    let c = Contributions::for_wage(wage, params);

    let calculations = vec![
        CalculationStep::new("Basic wage", basic_wage),
        CalculationStep::new("Variable wage", variable_wage),
        CalculationStep::new("Total monthly wage", wage),
        CalculationStep::new("Minimum insurable wage", params.min_wage),
        CalculationStep::new("Maximum insurable wage", params.max_wage),
        CalculationStep::new("Contribution wage", c.contribution_wage),
        CalculationStep::new(
            format!("Employee share ({}%)", percent(params.employee_rate)),
            c.employee,
        ),
        CalculationStep::new(
            format!("Employer share ({}%)", percent(params.employer_rate)),
            c.employer,
        ),
        CalculationStep::new("Total monthly contribution", c.employee + c.employer),
        CalculationStep::new("Annual employee contribution", c.employee * MONTHS_PER_YEAR),
    ];

    Report {
        summary: format!(
            "Monthly insurance contributions on a contribution wage of {}: employee {}, employer {}.",
            money(c.contribution_wage),
            money(c.employee),
            money(c.employer)
        ),
        calculations,
        gross_income: wage,
        total_tax: Decimal::ZERO,
        total_insurance: c.employee,
        net_income: wage - c.employee,
        applicable_laws: laws(LAWS),
    }
}

fn pension(
    average_wage: Decimal,
    contribution_years: Decimal,
) -> Report {
    let counted_years = contribution_years.min(PENSION_YEARS_CAP);
    let monthly_pension = average_wage * counted_years / PENSION_DIVISOR;

    let calculations = vec![
        CalculationStep::new("Average monthly wage", average_wage),
        CalculationStep::new("Contribution years", contribution_years),
        CalculationStep::new(
            format!("Years counted (capped at {PENSION_YEARS_CAP})"),
            counted_years,
        ),
        CalculationStep::new(
            format!("Monthly pension (wage × years / {PENSION_DIVISOR})"),
            monthly_pension,
        ),
    ];

    Report {
        summary: format!(
            "Estimated monthly pension of {} after {} contribution years.",
            money(monthly_pension),
            contribution_years
        ),
        calculations,
        gross_income: Decimal::ZERO,
        total_tax: Decimal::ZERO,
        total_insurance: Decimal::ZERO,
        net_income: monthly_pension,
        applicable_laws: laws(LAWS),
    }
}

fn lump_sum(
    average_wage: Decimal,
    contribution_years: Decimal,
) -> Report {
    let annual_wage = average_wage * MONTHS_PER_YEAR;
    let per_year = annual_wage * LUMP_SUM_FACTOR;
    let amount = per_year * contribution_years;

    let calculations = vec![
        CalculationStep::new("Average monthly wage", average_wage),
        CalculationStep::new("Annual wage", annual_wage),
        CalculationStep::new(
            format!("Entitlement per year ({}%)", percent(LUMP_SUM_FACTOR)),
            per_year,
        ),
        CalculationStep::new("Contribution years", contribution_years),
        CalculationStep::new("Lump-sum compensation", amount),
    ];

    Report {
        summary: format!(
            "Lump-sum compensation of {} for {} contribution years.",
            money(amount),
            contribution_years
        ),
        calculations,
        gross_income: Decimal::ZERO,
        total_tax: Decimal::ZERO,
        total_insurance: Decimal::ZERO,
        net_income: amount,
        applicable_laws: laws(LAWS),
    }
}
