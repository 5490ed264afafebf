//! Single entry point over every calculator.
//!
//! [`CalculatorParams`] is tagged by a `"calculator"` field so any saved or
//! hand-written parameter file can be routed without knowing its type in
//! advance:
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::calculator::{Calculator, CalculatorKind, CalculatorParams};
//! use fincalc_core::rates::RateTables;
//!
//! let params: CalculatorParams = serde_json::from_str(
//!     r#"{"calculator":"withholding_tax","amount":"10000","transaction_type":"services"}"#,
//! )
//! .unwrap();
//! assert_eq!(params.kind(), CalculatorKind::WithholdingTax);
//!
//! let rates = RateTables::builtin();
//! let report = Calculator::new(&rates).compute(&params).unwrap();
//! assert_eq!(report.total_tax, dec!(300));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::business::{
    self, CorporateTaxParams, CustomsParams, FeasibilityParams, ShareCapitalParams,
    StampDutyParams, VatParams, WithholdingTaxParams,
};
use crate::calculations::electricity::{self, ElectricityParams};
use crate::calculations::error::CalculationError;
use crate::calculations::income::{self, FreelancerTaxParams, PayrollParams, SalaryTaxParams};
use crate::calculations::inheritance::{self, InheritanceParams};
use crate::calculations::insurance::{self, SocialInsuranceParams};
use crate::calculations::planning::{
    self, EndOfServiceParams, InvestmentParams, LoanParams, RetirementParams, RoiParams,
};
use crate::calculations::property::{
    self, CapitalGainsParams, RealEstateTaxParams, RealEstateTransactionParams,
};
use crate::calculations::zakat::{self, ZakatParams};
use crate::models::Report;
use crate::rates::RateTables;

/// Parameters for any calculator, tagged with the calculator's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculatorParams {
    SalaryTax(SalaryTaxParams),
    Payroll(PayrollParams),
    FreelancerTax(FreelancerTaxParams),
    SocialInsurance(SocialInsuranceParams),
    CorporateTax(CorporateTaxParams),
    Vat(VatParams),
    WithholdingTax(WithholdingTaxParams),
    StampDuty(StampDutyParams),
    Customs(CustomsParams),
    ShareCapital(ShareCapitalParams),
    Feasibility(FeasibilityParams),
    RealEstateTax(RealEstateTaxParams),
    RealEstateTransactionTax(RealEstateTransactionParams),
    CapitalGainsTax(CapitalGainsParams),
    Inheritance(InheritanceParams),
    Zakat(ZakatParams),
    Electricity(ElectricityParams),
    Investment(InvestmentParams),
    EndOfService(EndOfServiceParams),
    Roi(RoiParams),
    Retirement(RetirementParams),
    Loan(LoanParams),
}

impl CalculatorParams {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            Self::SalaryTax(_) => CalculatorKind::SalaryTax,
            Self::Payroll(_) => CalculatorKind::Payroll,
            Self::FreelancerTax(_) => CalculatorKind::FreelancerTax,
            Self::SocialInsurance(_) => CalculatorKind::SocialInsurance,
            Self::CorporateTax(_) => CalculatorKind::CorporateTax,
            Self::Vat(_) => CalculatorKind::Vat,
            Self::WithholdingTax(_) => CalculatorKind::WithholdingTax,
            Self::StampDuty(_) => CalculatorKind::StampDuty,
            Self::Customs(_) => CalculatorKind::Customs,
            Self::ShareCapital(_) => CalculatorKind::ShareCapital,
            Self::Feasibility(_) => CalculatorKind::Feasibility,
            Self::RealEstateTax(_) => CalculatorKind::RealEstateTax,
            Self::RealEstateTransactionTax(_) => CalculatorKind::RealEstateTransactionTax,
            Self::CapitalGainsTax(_) => CalculatorKind::CapitalGainsTax,
            Self::Inheritance(_) => CalculatorKind::Inheritance,
            Self::Zakat(_) => CalculatorKind::Zakat,
            Self::Electricity(_) => CalculatorKind::Electricity,
            Self::Investment(_) => CalculatorKind::Investment,
            Self::EndOfService(_) => CalculatorKind::EndOfService,
            Self::Roi(_) => CalculatorKind::Roi,
            Self::Retirement(_) => CalculatorKind::Retirement,
            Self::Loan(_) => CalculatorKind::Loan,
        }
    }
}

/// Stable identifier of a calculator, as stored with saved history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    SalaryTax,
    Payroll,
    FreelancerTax,
    SocialInsurance,
    CorporateTax,
    Vat,
    WithholdingTax,
    StampDuty,
    Customs,
    ShareCapital,
    Feasibility,
    RealEstateTax,
    RealEstateTransactionTax,
    CapitalGainsTax,
    Inheritance,
    Zakat,
    Electricity,
    Investment,
    EndOfService,
    Roi,
    Retirement,
    Loan,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 22] = [
        Self::SalaryTax,
        Self::Payroll,
        Self::FreelancerTax,
        Self::SocialInsurance,
        Self::CorporateTax,
        Self::Vat,
        Self::WithholdingTax,
        Self::StampDuty,
        Self::Customs,
        Self::ShareCapital,
        Self::Feasibility,
        Self::RealEstateTax,
        Self::RealEstateTransactionTax,
        Self::CapitalGainsTax,
        Self::Inheritance,
        Self::Zakat,
        Self::Electricity,
        Self::Investment,
        Self::EndOfService,
        Self::Roi,
        Self::Retirement,
        Self::Loan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SalaryTax => "salary_tax",
            Self::Payroll => "payroll",
            Self::FreelancerTax => "freelancer_tax",
            Self::SocialInsurance => "social_insurance",
            Self::CorporateTax => "corporate_tax",
            Self::Vat => "vat",
            Self::WithholdingTax => "withholding_tax",
            Self::StampDuty => "stamp_duty",
            Self::Customs => "customs",
            Self::ShareCapital => "share_capital",
            Self::Feasibility => "feasibility",
            Self::RealEstateTax => "real_estate_tax",
            Self::RealEstateTransactionTax => "real_estate_transaction_tax",
            Self::CapitalGainsTax => "capital_gains_tax",
            Self::Inheritance => "inheritance",
            Self::Zakat => "zakat",
            Self::Electricity => "electricity",
            Self::Investment => "investment",
            Self::EndOfService => "end_of_service",
            Self::Roi => "roi",
            Self::Retirement => "retirement",
            Self::Loan => "loan",
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown calculator: {0}")]
pub struct UnknownCalculator(pub String);

impl FromStr for CalculatorKind {
    type Err = UnknownCalculator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownCalculator(s.to_string()))
    }
}

/// Routes parameters to their calculator against one set of rate tables.
#[derive(Debug, Clone, Copy)]
pub struct Calculator<'a> {
    rates: &'a RateTables,
}

impl<'a> Calculator<'a> {
    pub fn new(rates: &'a RateTables) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &'a RateTables {
        self.rates
    }

    /// Runs the calculator named by `params`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] from the calculators that can fail:
    /// feasibility, plus the compounding planners (investment, retirement
    /// and loan) when their figures leave the `Decimal` range.
    pub fn compute(
        &self,
        params: &CalculatorParams,
    ) -> Result<Report, CalculationError> {
        debug!(calculator = %params.kind(), "computing report");
        let rates = self.rates;

        let report = match params {
            CalculatorParams::SalaryTax(p) => income::salary_tax(p, rates),
            CalculatorParams::Payroll(p) => income::payroll(p, rates),
            CalculatorParams::FreelancerTax(p) => income::freelancer_tax(p, rates),
            CalculatorParams::SocialInsurance(p) => insurance::social_insurance(p, rates),
            CalculatorParams::CorporateTax(p) => business::corporate_tax(p),
            CalculatorParams::Vat(p) => business::vat(p),
            CalculatorParams::WithholdingTax(p) => business::withholding_tax(p),
            CalculatorParams::StampDuty(p) => business::stamp_duty(p),
            CalculatorParams::Customs(p) => business::customs(p),
            CalculatorParams::ShareCapital(p) => business::share_capital(p),
            CalculatorParams::Feasibility(p) => business::feasibility(p)?,
            CalculatorParams::RealEstateTax(p) => property::real_estate_tax(p),
            CalculatorParams::RealEstateTransactionTax(p) => {
                property::real_estate_transaction_tax(p)
            }
            CalculatorParams::CapitalGainsTax(p) => property::capital_gains_tax(p),
            CalculatorParams::Inheritance(p) => inheritance::inheritance(p),
            CalculatorParams::Zakat(p) => zakat::zakat(p),
            CalculatorParams::Electricity(p) => electricity::electricity(p, rates),
            CalculatorParams::Investment(p) => planning::investment(p)?,
            CalculatorParams::EndOfService(p) => planning::end_of_service(p),
            CalculatorParams::Roi(p) => planning::roi(p),
            CalculatorParams::Retirement(p) => planning::retirement(p)?,
            CalculatorParams::Loan(p) => planning::loan(p)?,
        };

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::business::{StampDutyType, VatBuckets};

    fn compute(json: &str) -> Result<Report, CalculationError> {
        let params: CalculatorParams = serde_json::from_str(json).unwrap();
        Calculator::new(&RateTables::builtin()).compute(&params)
    }

    #[test]
    fn kind_names_round_trip_through_from_str() {
        for kind in CalculatorKind::ALL {
            assert_eq!(kind.as_str().parse::<CalculatorKind>(), Ok(kind));
        }
    }

    #[test]
    fn kind_serializes_as_its_name() {
        for kind in CalculatorKind::ALL {
            assert_eq!(
                serde_json::to_string(&kind).unwrap(),
                format!("\"{}\"", kind.as_str())
            );
        }
    }

    #[test]
    fn unknown_kind_fails_to_parse() {
        assert_eq!(
            "lottery".parse::<CalculatorKind>(),
            Err(UnknownCalculator("lottery".to_string()))
        );
    }

    #[test]
    fn params_tag_matches_kind() {
        let params = CalculatorParams::StampDuty(StampDutyParams {
            amount: dec!(1000),
            transaction_type: StampDutyType::Contract,
        });

        let json = serde_json::to_value(&params).unwrap();

        assert_eq!(json["calculator"], params.kind().as_str());
    }

    #[test]
    fn dispatches_salary_tax_with_year_tables() {
        let report = compute(
            r#"{"calculator":"salary_tax","income":"120000","income_period":"annual","year":2024,"insurance":"uninsured"}"#,
        )
        .unwrap();

        assert_eq!(report.total_tax, dec!(9750));
    }

    #[test]
    fn dispatches_nested_social_insurance_mode() {
        let report = compute(
            r#"{"calculator":"social_insurance","calculation_type":"lump_sum","average_wage":"5000","contribution_years":"10"}"#,
        )
        .unwrap();

        assert_eq!(report.net_income, dec!(90000));
    }

    #[test]
    fn propagates_feasibility_error() {
        let err = compute(
            r#"{"calculator":"feasibility","fixed_costs":"1000","variable_cost_per_unit":"50","selling_price_per_unit":"40"}"#,
        )
        .unwrap_err();

        assert_eq!(err.message_key(), "errors.feasibility.margin");
    }

    #[test]
    fn propagates_investment_overflow() {
        let err = compute(
            r#"{"calculator":"investment","initial_amount":"1000","monthly_contribution":"100","annual_rate":"12","years":600}"#,
        )
        .unwrap_err();

        assert_eq!(err, CalculationError::Overflow { field: "future_value" });
    }

    #[test]
    fn params_are_snake_case_and_reports_camel_case() {
        let params: CalculatorParams = serde_json::from_str(
            r#"{"calculator":"social_insurance","calculation_type":"lump_sum","average_wage":"5000","contribution_years":"10"}"#,
        )
        .unwrap();
        let report = Calculator::new(&RateTables::builtin()).compute(&params).unwrap();

        let params_json = serde_json::to_string(&params).unwrap();
        let report_json = serde_json::to_string(&report).unwrap();

        assert!(params_json.contains(r#""calculation_type":"lump_sum""#));
        assert!(params_json.contains(r#""average_wage""#));
        assert!(report_json.contains(r#""netIncome""#));
        assert!(report_json.contains(r#""applicableLaws""#));
        assert!(!report_json.contains("net_income"));
    }

    #[test]
    fn params_survive_json_round_trip() {
        let params = CalculatorParams::Vat(VatParams {
            sales: VatBuckets {
                rate14: dec!(10000),
                ..VatBuckets::default()
            },
            purchases: VatBuckets::default(),
            previous_credit: Decimal::ZERO,
        });

        let json = serde_json::to_string(&params).unwrap();
        let back: CalculatorParams = serde_json::from_str(&json).unwrap();

        assert_eq!(back, params);
    }
}
