//! Personal planning calculators: investment growth, end-of-service
//! gratuity, return on investment, retirement savings and loan
//! amortization.
//!
//! Rates are entered as percentages (`12` for 12%) and compounded monthly:
//! `r = annual_rate / 100 / 12` over `n = years × 12` periods.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{
    MONTHS_PER_YEAR, checked_compound, laws, max, money, round_half_up,
};
use crate::calculations::error::CalculationError;
use crate::models::{CalculationStep, Report};

/// Years of service paid at half a month's salary each.
pub const GRATUITY_FIRST_TIER_YEARS: Decimal = dec!(5);
/// Capital needed per unit of annual income under the 4% withdrawal rule.
pub const WITHDRAWAL_MULTIPLE: Decimal = dec!(25);

const LABOUR_LAW: &str = "Labour Law No. 12 of 2003";
const BANKING_LAW: &str = "Central Bank and Banking System Law No. 194 of 2020";

fn monthly_rate(annual_percent: Decimal) -> Decimal {
    annual_percent / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR
}

/// Number of monthly periods in `years`.
fn months(
    years: u32,
    field: &'static str,
) -> Result<u32, CalculationError> {
    years
        .checked_mul(12)
        .ok_or(CalculationError::Overflow { field })
}

/// Future value of `present` plus `n` end-of-month `contribution`s, or
/// `None` when it exceeds the `Decimal` range.
fn future_value(
    present: Decimal,
    contribution: Decimal,
    rate: Decimal,
    periods: u32,
) -> Option<Decimal> {
    let n = Decimal::from(periods);
    if rate.is_zero() {
        return present.checked_add(contribution.checked_mul(n)?);
    }
    let growth = checked_compound(rate, periods)?;
    let annuity = contribution
        .checked_mul(growth - Decimal::ONE)?
        .checked_div(rate)?;
    present.checked_mul(growth)?.checked_add(annuity)
}

// =============================================================================
// Investment growth
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentParams {
    pub initial_amount: Decimal,
    #[serde(default)]
    pub monthly_contribution: Decimal,
    pub annual_rate: Decimal,
    pub years: u32,
}

/// Report mapping: gross = total contributed, net = future value.
///
/// # Errors
///
/// Returns [`CalculationError::Overflow`] when the horizon and rate push
/// the future value out of range.
pub fn investment(params: &InvestmentParams) -> Result<Report, CalculationError> {
    let periods = months(params.years, "years")?;
    let rate = monthly_rate(params.annual_rate);
    let value = future_value(
        params.initial_amount,
        params.monthly_contribution,
        rate,
        periods,
    )
    .ok_or(CalculationError::Overflow { field: "future_value" })?;
    let contributed = params
        .monthly_contribution
        .checked_mul(Decimal::from(periods))
        .and_then(|c| c.checked_add(params.initial_amount))
        .ok_or(CalculationError::Overflow { field: "total_contributed" })?;
    let earnings = value
        .checked_sub(contributed)
        .ok_or(CalculationError::Overflow { field: "earnings" })?;

    Ok(Report {
        summary: format!(
            "After {} years the investment grows to {}, earning {}.",
            params.years,
            money(value),
            money(earnings)
        ),
        calculations: vec![
            CalculationStep::new("Initial amount", params.initial_amount),
            CalculationStep::new("Monthly contribution", params.monthly_contribution),
            CalculationStep::new("Monthly rate", rate),
            CalculationStep::new("Number of months", Decimal::from(periods)),
            CalculationStep::new("Total contributed", contributed),
            CalculationStep::new("Earnings", earnings),
            CalculationStep::new("Future value", value),
        ],
        gross_income: contributed,
        total_tax: Decimal::ZERO,
        total_insurance: Decimal::ZERO,
        net_income: value,
        applicable_laws: Vec::new(),
    })
}

// =============================================================================
// End-of-service gratuity
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndOfServiceParams {
    pub last_monthly_salary: Decimal,
    pub years_of_service: Decimal,
}

/// Half a month per year for the first five years, a full month per year
/// after that.
///
/// Report mapping: gross = net = gratuity.
pub fn end_of_service(params: &EndOfServiceParams) -> Report {
    let salary = params.last_monthly_salary;
    let first_years = params.years_of_service.min(GRATUITY_FIRST_TIER_YEARS);
    let later_years = max(params.years_of_service - GRATUITY_FIRST_TIER_YEARS, Decimal::ZERO);
    let first_tier = first_years * salary / dec!(2);
    let second_tier = later_years * salary;
    let gratuity = first_tier + second_tier;

    Report {
        summary: format!(
            "End-of-service gratuity of {} for {} years of service.",
            money(gratuity),
            params.years_of_service
        ),
        calculations: vec![
            CalculationStep::new("Last monthly salary", salary),
            CalculationStep::new("Years of service", params.years_of_service),
            CalculationStep::new("First 5 years (half month per year)", first_tier),
            CalculationStep::new("Years beyond 5 (full month per year)", second_tier),
            CalculationStep::new("Total gratuity", gratuity),
        ],
        gross_income: gratuity,
        total_tax: Decimal::ZERO,
        total_insurance: Decimal::ZERO,
        net_income: gratuity,
        applicable_laws: laws(&[LABOUR_LAW]),
    }
}

// =============================================================================
// Return on investment
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiParams {
    pub initial_investment: Decimal,
    pub final_value: Decimal,
}

/// Report mapping: gross = final value, net = net profit.
pub fn roi(params: &RoiParams) -> Report {
    let profit = params.final_value - params.initial_investment;
    let roi_percent = if params.initial_investment.is_zero() {
        Decimal::ZERO
    } else {
        profit / params.initial_investment * Decimal::ONE_HUNDRED
    };

    Report {
        summary: format!(
            "Net profit of {} is a return of {}%.",
            money(profit),
            round_half_up(roi_percent)
        ),
        calculations: vec![
            CalculationStep::new("Initial investment", params.initial_investment),
            CalculationStep::new("Final value", params.final_value),
            CalculationStep::new("Net profit", profit),
            CalculationStep::new("Return on investment (%)", roi_percent),
        ],
        gross_income: params.final_value,
        total_tax: Decimal::ZERO,
        total_insurance: Decimal::ZERO,
        net_income: profit,
        applicable_laws: Vec::new(),
    }
}

// =============================================================================
// Retirement
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementParams {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_savings: Decimal,
    pub monthly_contribution: Decimal,
    /// Percent per year.
    pub expected_annual_return: Decimal,
    pub desired_monthly_income: Decimal,
}

/// Projects savings at retirement and compares them to the capital the
/// 4% rule requires for the desired income.
///
/// Report mapping: gross = projected savings, net = surplus (negative for
/// a shortfall).
///
/// # Errors
///
/// Returns [`CalculationError::InvalidInput`] if the retirement age is
/// before the current age, and [`CalculationError::Overflow`] when the
/// projection leaves the `Decimal` range.
pub fn retirement(params: &RetirementParams) -> Result<Report, CalculationError> {
    let years = params
        .retirement_age
        .checked_sub(params.current_age)
        .ok_or_else(|| CalculationError::InvalidInput {
            field: "retirement_age",
            reason: format!(
                "{} is before the current age {}",
                params.retirement_age, params.current_age
            ),
        })?;

    let periods = months(years, "retirement_age")?;
    let projected = future_value(
        params.current_savings,
        params.monthly_contribution,
        monthly_rate(params.expected_annual_return),
        periods,
    )
    .ok_or(CalculationError::Overflow { field: "projected_savings" })?;
    let required = params
        .desired_monthly_income
        .checked_mul(MONTHS_PER_YEAR * WITHDRAWAL_MULTIPLE)
        .ok_or(CalculationError::Overflow { field: "required_capital" })?;
    let surplus = projected
        .checked_sub(required)
        .ok_or(CalculationError::Overflow { field: "surplus" })?;

    let summary = if surplus >= Decimal::ZERO {
        format!(
            "Projected savings of {} cover the required {} with {} to spare.",
            money(projected),
            money(required),
            money(surplus)
        )
    } else {
        format!(
            "Projected savings of {} fall {} short of the required {}.",
            money(projected),
            money(-surplus),
            money(required)
        )
    };

    Ok(Report {
        summary,
        calculations: vec![
            CalculationStep::new("Years until retirement", Decimal::from(years)),
            CalculationStep::new("Current savings", params.current_savings),
            CalculationStep::new("Monthly contribution", params.monthly_contribution),
            CalculationStep::new("Projected savings", projected),
            CalculationStep::new("Required capital (4% rule)", required),
            CalculationStep::new(
                if surplus >= Decimal::ZERO { "Surplus" } else { "Shortfall" },
                surplus,
            ),
        ],
        gross_income: projected,
        total_tax: Decimal::ZERO,
        total_insurance: Decimal::ZERO,
        net_income: surplus,
        applicable_laws: Vec::new(),
    })
}

// =============================================================================
// Loan amortization
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanParams {
    pub amount: Decimal,
    /// Percent per year.
    pub annual_rate: Decimal,
    pub years: u32,
}

/// Fixed monthly payment on an amortizing loan, rounded to the piastre.
///
/// `None` when the payment is out of range or `periods` is zero.
pub fn monthly_payment(
    amount: Decimal,
    rate: Decimal,
    periods: u32,
) -> Option<Decimal> {
    let n = Decimal::from(periods);
    if rate.is_zero() {
        return amount.checked_div(n).map(round_half_up);
    }
    let growth = checked_compound(rate, periods)?;
    amount
        .checked_mul(rate)?
        .checked_mul(growth)?
        .checked_div(growth - Decimal::ONE)
        .map(round_half_up)
}

/// Report mapping: gross = principal, tax = total interest, net = total
/// repaid.
///
/// # Errors
///
/// Returns [`CalculationError::InvalidInput`] for a zero-year term and
/// [`CalculationError::Overflow`] when the term and rate push the payment
/// out of range.
pub fn loan(params: &LoanParams) -> Result<Report, CalculationError> {
    if params.years == 0 {
        return Err(CalculationError::InvalidInput {
            field: "years",
            reason: "loan term must be at least one year".to_string(),
        });
    }

    let periods = months(params.years, "years")?;
    let rate = monthly_rate(params.annual_rate);
    let payment = monthly_payment(params.amount, rate, periods)
        .ok_or(CalculationError::Overflow { field: "monthly_payment" })?;
    let total_payment = payment
        .checked_mul(Decimal::from(periods))
        .ok_or(CalculationError::Overflow { field: "total_payment" })?;
    let total_interest = total_payment
        .checked_sub(params.amount)
        .ok_or(CalculationError::Overflow { field: "total_interest" })?;

    let mut calculations = vec![
        CalculationStep::new("Loan amount", params.amount),
        CalculationStep::new("Monthly rate", rate),
        CalculationStep::new("Number of payments", Decimal::from(periods)),
        CalculationStep::new("Monthly payment", payment),
    ];

    let mut balance = params.amount;
    for year in 1..=params.years {
        for _ in 0..12 {
            balance = balance
                .checked_mul(rate)
                .and_then(|interest| balance.checked_add(interest))
                .and_then(|owed| owed.checked_sub(payment))
                .ok_or(CalculationError::Overflow { field: "remaining_balance" })?;
        }
        calculations.push(CalculationStep::new(
            format!("Remaining balance after year {year}"),
            round_half_up(max(balance, Decimal::ZERO)),
        ));
    }
    calculations.push(CalculationStep::new("Total payment", total_payment));
    calculations.push(CalculationStep::new("Total interest", total_interest));

    Ok(Report {
        summary: format!(
            "Monthly payment of {} over {} months; total interest {}.",
            money(payment),
            periods,
            money(total_interest)
        ),
        calculations,
        gross_income: params.amount,
        total_tax: total_interest,
        total_insurance: Decimal::ZERO,
        net_income: total_payment,
        applicable_laws: laws(&[BANKING_LAW]),
    })
}
