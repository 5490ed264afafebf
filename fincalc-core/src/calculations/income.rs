//! Personal income tax: salaried employees, monthly payroll and
//! freelancers.
//!
//! All three share one chain: reduce gross income to a taxable base, take
//! the personal exemption off, then walk the year's progressive brackets
//! (see [`crate::calculations::brackets`]).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::calculations::income::{
//!     IncomePeriod, InsuranceCoverage, SalaryTaxParams, salary_tax,
//! };
//! use fincalc_core::rates::RateTables;
//!
//! let params = SalaryTaxParams {
//!     income: dec!(10000),
//!     income_period: IncomePeriod::Monthly,
//!     year: 2024,
//!     insurance: InsuranceCoverage::Insured,
//! };
//!
//! let report = salary_tax(&params, &RateTables::builtin());
//!
//! assert_eq!(report.gross_income, dec!(120000));
//! assert_eq!(report.total_insurance, dec!(13200));
//! assert_eq!(report.total_tax, dec!(7110));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::brackets::{apply_brackets, taxable_after_exemption};
use crate::calculations::common::{MONTHS_PER_YEAR, max, money, percent, round_half_up};
use crate::calculations::insurance::Contributions;
use crate::models::{CalculationStep, Report};
use crate::rates::RateTables;

/// Share of freelance revenue deducted when actual expenses are not kept.
pub const DEEMED_EXPENSE_RATE: Decimal = dec!(0.10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomePeriod {
    Monthly,
    Annual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceCoverage {
    Insured,
    Uninsured,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryTaxParams {
    pub income: Decimal,
    pub income_period: IncomePeriod,
    pub year: i32,
    pub insurance: InsuranceCoverage,
}

/// Monthly figures for a single employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollParams {
    pub basic_salary: Decimal,
    #[serde(default)]
    pub allowances: Decimal,
    #[serde(default)]
    pub bonuses: Decimal,
    #[serde(default)]
    pub other_deductions: Decimal,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseMethod {
    Deemed,
    Actual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreelancerTaxParams {
    pub revenue: Decimal,
    pub expense_method: ExpenseMethod,
    /// Only read when `expense_method` is `Actual`.
    #[serde(default)]
    pub actual_expenses: Decimal,
    pub year: i32,
}

/// Law citations for personal income tax in `year`.
pub fn income_tax_laws(year: i32) -> Vec<String> {
    let amendment = match year {
        ..=2022 => "Law No. 26 of 2020 amending the Income Tax Law",
        2023 => "Law No. 30 of 2023 amending the Income Tax Law",
        _ => "Law No. 7 of 2024 amending the Income Tax Law",
    };
    vec![
        "Income Tax Law No. 91 of 2005".to_string(),
        amendment.to_string(),
    ]
}

/// Annual salary tax for an employee.
///
/// Report mapping (all annual): gross = annual gross income, tax = income
/// tax, insurance = employee social insurance, net = gross − tax −
/// insurance.
pub fn salary_tax(
    params: &SalaryTaxParams,
    rates: &RateTables,
) -> Report {
    let year_rates = rates.lookup(params.year);
    let table = &year_rates.income_tax;

    let annual_gross = match params.income_period {
        IncomePeriod::Monthly => params.income * MONTHS_PER_YEAR,
        IncomePeriod::Annual => params.income,
    };
    let monthly_wage = annual_gross / MONTHS_PER_YEAR;

    let mut calculations = vec![CalculationStep::new("Annual gross income", annual_gross)];

    let annual_insurance = match params.insurance {
        InsuranceCoverage::Insured => {
            let c = Contributions::for_wage(monthly_wage, &year_rates.insurance);
            let annual = c.employee * MONTHS_PER_YEAR;
            calculations.push(CalculationStep::new("Monthly contribution wage", c.contribution_wage));
            calculations.push(CalculationStep::new(
                format!(
                    "Annual employee insurance ({}%)",
                    percent(year_rates.insurance.employee_rate)
                ),
                annual,
            ));
            annual
        }
        InsuranceCoverage::Uninsured => Decimal::ZERO,
    };

    let after_insurance = max(annual_gross - annual_insurance, Decimal::ZERO);
    let taxable = taxable_after_exemption(after_insurance, table);
    calculations.push(CalculationStep::new("Personal exemption", table.personal_exemption));
    calculations.push(CalculationStep::new("Taxable income", taxable));

    let breakdown = apply_brackets(taxable, &table.brackets);
    breakdown.push_steps(&mut calculations);

    let tax = breakdown.total_tax;
    let net = annual_gross - tax - annual_insurance;
    calculations.push(CalculationStep::new("Total annual tax", tax));
    calculations.push(CalculationStep::new("Monthly tax", tax / MONTHS_PER_YEAR));
    calculations.push(CalculationStep::new("Annual net income", net));
    calculations.push(CalculationStep::new("Monthly net income", net / MONTHS_PER_YEAR));

    let mut laws = income_tax_laws(rates.resolve_year(params.year));
    if params.insurance == InsuranceCoverage::Insured {
        laws.push("Social Insurance and Pensions Law No. 148 of 2019".to_string());
    }

    Report {
        summary: format!(
            "Annual income tax of {} on gross income of {}, leaving {} net.",
            money(tax),
            money(annual_gross),
            money(net)
        ),
        calculations,
        gross_income: annual_gross,
        total_tax: tax,
        total_insurance: annual_insurance,
        net_income: net,
        applicable_laws: laws,
    }
}

/// Monthly payroll for one employee.
///
/// Insurance is charged on basic salary plus allowances; bonuses are taxed
/// but not insured. The annualized tax is spread evenly over twelve months
/// and rounded to the piastre.
///
/// Report mapping (all monthly): gross = basic + allowances + bonuses,
/// tax = monthly income tax, insurance = employee share, net = take-home
/// pay after other deductions.
pub fn payroll(
    params: &PayrollParams,
    rates: &RateTables,
) -> Report {
    let year_rates = rates.lookup(params.year);
    let table = &year_rates.income_tax;

    let insurable = params.basic_salary + params.allowances;
    let gross = insurable + params.bonuses;
    let c = Contributions::for_wage(insurable, &year_rates.insurance);

    let annual_base = max(gross - c.employee, Decimal::ZERO) * MONTHS_PER_YEAR;
    let taxable = taxable_after_exemption(annual_base, table);
    let breakdown = apply_brackets(taxable, &table.brackets);
    let monthly_tax = round_half_up(breakdown.total_tax / MONTHS_PER_YEAR);
    let net = gross - c.employee - monthly_tax - params.other_deductions;
    let employer_cost = gross + c.employer;

    let mut calculations = vec![
        CalculationStep::new("Basic salary", params.basic_salary),
        CalculationStep::new("Allowances", params.allowances),
        CalculationStep::new("Bonuses", params.bonuses),
        CalculationStep::new("Monthly gross pay", gross),
        CalculationStep::new("Contribution wage", c.contribution_wage),
        CalculationStep::new(
            format!(
                "Employee insurance ({}%)",
                percent(year_rates.insurance.employee_rate)
            ),
            c.employee,
        ),
        CalculationStep::new(
            format!(
                "Employer insurance ({}%)",
                percent(year_rates.insurance.employer_rate)
            ),
            c.employer,
        ),
        CalculationStep::new("Annualized taxable base", annual_base),
        CalculationStep::new("Personal exemption", table.personal_exemption),
        CalculationStep::new("Annual taxable income", taxable),
    ];
    breakdown.push_steps(&mut calculations);
    calculations.push(CalculationStep::new("Annual tax", breakdown.total_tax));
    calculations.push(CalculationStep::new("Monthly tax", monthly_tax));
    calculations.push(CalculationStep::new("Other deductions", params.other_deductions));
    calculations.push(CalculationStep::new("Net pay", net));
    calculations.push(CalculationStep::new("Total employer cost", employer_cost));

    let mut laws = income_tax_laws(rates.resolve_year(params.year));
    laws.push("Social Insurance and Pensions Law No. 148 of 2019".to_string());
    laws.push("Labour Law No. 12 of 2003".to_string());

    Report {
        summary: format!(
            "Net monthly pay of {} from gross pay of {}; employer cost {}.",
            money(net),
            money(gross),
            money(employer_cost)
        ),
        calculations,
        gross_income: gross,
        total_tax: monthly_tax,
        total_insurance: c.employee,
        net_income: net,
        applicable_laws: laws,
    }
}

/// Annual tax on freelance (non-commercial professional) income.
///
/// Report mapping: gross = revenue, tax = income tax, net = revenue −
/// expenses − tax.
pub fn freelancer_tax(
    params: &FreelancerTaxParams,
    rates: &RateTables,
) -> Report {
    let table = &rates.lookup(params.year).income_tax;

    let (expenses, expense_label) = match params.expense_method {
        ExpenseMethod::Deemed => (
            params.revenue * DEEMED_EXPENSE_RATE,
            format!("Deemed expenses ({}%)", percent(DEEMED_EXPENSE_RATE)),
        ),
        ExpenseMethod::Actual => (params.actual_expenses, "Actual expenses".to_string()),
    };
    let net_profit = max(params.revenue - expenses, Decimal::ZERO);
    let taxable = taxable_after_exemption(net_profit, table);

    let mut calculations = vec![
        CalculationStep::new("Annual revenue", params.revenue),
        CalculationStep::new(expense_label, expenses),
        CalculationStep::new("Net professional income", net_profit),
        CalculationStep::new("Personal exemption", table.personal_exemption),
        CalculationStep::new("Taxable income", taxable),
    ];

    let breakdown = apply_brackets(taxable, &table.brackets);
    breakdown.push_steps(&mut calculations);

    let tax = breakdown.total_tax;
    let net = params.revenue - expenses - tax;
    calculations.push(CalculationStep::new("Total tax", tax));
    calculations.push(CalculationStep::new("Net income after tax", net));

    Report {
        summary: format!(
            "Freelance income tax of {} on revenue of {}.",
            money(tax),
            money(params.revenue)
        ),
        calculations,
        gross_income: params.revenue,
        total_tax: tax,
        total_insurance: Decimal::ZERO,
        net_income: net,
        applicable_laws: income_tax_laws(rates.resolve_year(params.year)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn salary(
        income: Decimal,
        period: IncomePeriod,
        insurance: InsuranceCoverage,
    ) -> SalaryTaxParams {
        SalaryTaxParams {
            income,
            income_period: period,
            year: 2024,
            insurance,
        }
    }

    // =========================================================================
    // salary_tax tests
    // =========================================================================

    #[test]
    fn salary_tax_monthly_insured() {
        let report = salary_tax(
            &salary(dec!(10000), IncomePeriod::Monthly, InsuranceCoverage::Insured),
            &RateTables::builtin(),
        );

        // Gross 120000, insurance 10000 × 11% × 12 = 13200
        // Taxable 120000 − 13200 − 20000 = 86800
        // Tax 0 + 1500 + 2250 + 16800 × 20% = 7110
        assert_eq!(report.gross_income, dec!(120000));
        assert_eq!(report.total_insurance, dec!(13200));
        assert_eq!(report.step("Taxable income").and_then(|s| s.value()), Some(dec!(86800)));
        assert_eq!(report.total_tax, dec!(7110));
        assert_eq!(report.net_income, dec!(99690));
    }

    #[test]
    fn salary_tax_annual_uninsured_skips_insurance() {
        let report = salary_tax(
            &salary(dec!(120000), IncomePeriod::Annual, InsuranceCoverage::Uninsured),
            &RateTables::builtin(),
        );

        // Taxable 100000: 1500 + 2250 + 30000 × 20%
        assert_eq!(report.total_insurance, Decimal::ZERO);
        assert_eq!(report.total_tax, dec!(9750));
        assert!(report.step("Annual employee insurance").is_none());
    }

    #[test]
    fn salary_tax_insurance_capped_at_ceiling() {
        let report = salary_tax(
            &salary(dec!(50000), IncomePeriod::Monthly, InsuranceCoverage::Insured),
            &RateTables::builtin(),
        );

        // 12600 × 11% × 12
        assert_eq!(report.total_insurance, dec!(16632));
    }

    #[test]
    fn salary_tax_below_exemption_has_zero_tax() {
        let report = salary_tax(
            &salary(dec!(18000), IncomePeriod::Annual, InsuranceCoverage::Uninsured),
            &RateTables::builtin(),
        );

        assert_eq!(report.total_tax, Decimal::ZERO);
        assert!(report.step("Bracket").is_none());
        assert_eq!(report.net_income, dec!(18000));
    }

    #[test]
    fn salary_tax_records_zero_rate_first_bracket() {
        let report = salary_tax(
            &salary(dec!(50000), IncomePeriod::Annual, InsuranceCoverage::Uninsured),
            &RateTables::builtin(),
        );

        let first = report.step("Bracket 1").unwrap();
        assert_eq!(first.value(), Some(dec!(0)));
    }

    #[test]
    fn salary_tax_unknown_year_uses_fallback_laws_and_tables() {
        let mut params = salary(dec!(120000), IncomePeriod::Annual, InsuranceCoverage::Uninsured);
        params.year = 2031;

        let report = salary_tax(&params, &RateTables::builtin());

        assert_eq!(report.total_tax, dec!(9750));
        assert!(
            report
                .applicable_laws
                .contains(&"Law No. 7 of 2024 amending the Income Tax Law".to_string())
        );
    }

    #[test]
    fn salary_tax_2022_uses_older_schedule() {
        let mut params = salary(dec!(69000), IncomePeriod::Annual, InsuranceCoverage::Uninsured);
        params.year = 2022;

        let report = salary_tax(&params, &RateTables::builtin());

        // Taxable 60000: 0 + 375 + 1500 + 2250
        assert_eq!(report.total_tax, dec!(4125));
    }

    // =========================================================================
    // payroll tests
    // =========================================================================

    #[test]
    fn payroll_monthly_breakdown() {
        let params = PayrollParams {
            basic_salary: dec!(8000),
            allowances: dec!(2000),
            bonuses: dec!(1000),
            other_deductions: dec!(150),
            year: 2024,
        };

        let report = payroll(&params, &RateTables::builtin());

        // Gross 11000, insurance on 10000 → 1100 employee, 1875 employer
        // Annual base (11000 − 1100) × 12 = 118800, taxable 98800
        // Tax 1500 + 2250 + 28800 × 20% = 9510 → 792.50 per month
        assert_eq!(report.gross_income, dec!(11000));
        assert_eq!(report.total_insurance, dec!(1100));
        assert_eq!(report.total_tax, dec!(792.50));
        assert_eq!(report.net_income, dec!(8957.50));
        assert_eq!(
            report.step("Total employer cost").and_then(|s| s.value()),
            Some(dec!(12875))
        );
    }

    #[test]
    fn payroll_low_salary_insured_at_floor() {
        let params = PayrollParams {
            basic_salary: dec!(1500),
            allowances: Decimal::ZERO,
            bonuses: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
            year: 2024,
        };

        let report = payroll(&params, &RateTables::builtin());

        // Floor 2000 × 11%
        assert_eq!(report.total_insurance, dec!(220));
        assert_eq!(report.total_tax, Decimal::ZERO);
    }

    // =========================================================================
    // freelancer_tax tests
    // =========================================================================

    #[test]
    fn freelancer_deemed_expenses() {
        let params = FreelancerTaxParams {
            revenue: dec!(200000),
            expense_method: ExpenseMethod::Deemed,
            actual_expenses: dec!(99999),
            year: 2024,
        };

        let report = freelancer_tax(&params, &RateTables::builtin());

        // Net 180000, taxable 160000: 1500 + 2250 + 90000 × 20%
        assert_eq!(
            report.step("Deemed expenses").and_then(|s| s.value()),
            Some(dec!(20000))
        );
        assert_eq!(report.total_tax, dec!(21750));
        assert_eq!(report.net_income, dec!(158250));
    }

    #[test]
    fn freelancer_actual_expenses() {
        let params = FreelancerTaxParams {
            revenue: dec!(200000),
            expense_method: ExpenseMethod::Actual,
            actual_expenses: dec!(50000),
            year: 2024,
        };

        let report = freelancer_tax(&params, &RateTables::builtin());

        // Taxable 130000: 1500 + 2250 + 60000 × 20%
        assert_eq!(report.total_tax, dec!(15750));
    }

    #[test]
    fn freelancer_expenses_above_revenue_owe_nothing() {
        let params = FreelancerTaxParams {
            revenue: dec!(50000),
            expense_method: ExpenseMethod::Actual,
            actual_expenses: dec!(80000),
            year: 2024,
        };

        let report = freelancer_tax(&params, &RateTables::builtin());

        assert_eq!(report.total_tax, Decimal::ZERO);
        assert_eq!(
            report.step("Taxable income").and_then(|s| s.value()),
            Some(Decimal::ZERO)
        );
    }
}
