//! Business taxes and company calculators.
//!
//! | Calculator      | Base                         | Rate                        |
//! |-----------------|------------------------------|-----------------------------|
//! | corporate       | revenue − expenses           | 22.5% or turnover regime    |
//! | vat             | sales / purchases per tier   | 14%, 10%, 5%                |
//! | withholding     | payment amount               | 1% / 3% / 5% by type        |
//! | stamp duty      | transaction amount           | per type, % or fixed fee    |
//! | customs         | shipment value               | duty by category + 14% VAT  |
//!
//! Share capital and break-even feasibility live here too since they
//! describe the same company rather than a person.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{laws, max, money, percent};
use crate::calculations::error::CalculationError;
use crate::models::{CalculationStep, Report};

/// Standard corporate income tax rate.
pub const CORPORATE_RATE: Decimal = dec!(0.225);
/// Turnover above which the small-enterprise regime no longer applies.
pub const SMALL_ENTERPRISE_CEILING: Decimal = dec!(10000000);
/// VAT charged on imports and the standard VAT tier.
pub const STANDARD_VAT_RATE: Decimal = dec!(0.14);
/// Fixed clearance fee added to every customs declaration.
pub const CUSTOMS_ANCILLARY_FEE: Decimal = dec!(500);

const INCOME_TAX_LAW: &str = "Income Tax Law No. 91 of 2005";
const SMALL_ENTERPRISE_LAW: &str =
    "Law No. 152 of 2020 on Micro, Small and Medium Enterprises";
const VAT_LAW: &str = "Value Added Tax Law No. 67 of 2016";
const STAMP_DUTY_LAW: &str = "Stamp Duty Law No. 111 of 1980";
const CUSTOMS_LAW: &str = "Customs Law No. 207 of 2020";
const COMPANIES_LAW: &str = "Companies Law No. 159 of 1981";

// =============================================================================
// Corporate tax
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorporateRegime {
    #[default]
    Standard,
    SmallEnterprise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateTaxParams {
    pub revenue: Decimal,
    pub expenses: Decimal,
    #[serde(default)]
    pub regime: CorporateRegime,
}

/// Tax owed under the turnover-based small-enterprise regime, or `None`
/// when turnover exceeds the eligibility ceiling.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::business::small_enterprise_tax;
///
/// assert_eq!(small_enterprise_tax(dec!(400000)), Some(dec!(2500)));
/// assert_eq!(small_enterprise_tax(dec!(2500000)), Some(dec!(18750)));
/// assert_eq!(small_enterprise_tax(dec!(12000000)), None);
/// ```
pub fn small_enterprise_tax(turnover: Decimal) -> Option<Decimal> {
    let tax = if turnover < dec!(250000) {
        dec!(1000)
    } else if turnover < dec!(500000) {
        dec!(2500)
    } else if turnover < dec!(1000000) {
        dec!(5000)
    } else if turnover < dec!(2000000) {
        turnover * dec!(0.005)
    } else if turnover < dec!(3000000) {
        turnover * dec!(0.0075)
    } else if turnover <= SMALL_ENTERPRISE_CEILING {
        turnover * dec!(0.01)
    } else {
        return None;
    };
    Some(tax)
}

/// Corporate income tax.
///
/// Report mapping: gross = revenue, tax = corporate tax, net = profit −
/// tax. A loss under the standard regime owes nothing.
pub fn corporate_tax(params: &CorporateTaxParams) -> Report {
    let profit = params.revenue - params.expenses;
    let mut calculations = vec![
        CalculationStep::new("Revenue", params.revenue),
        CalculationStep::new("Expenses", params.expenses),
        CalculationStep::new("Net profit", profit),
    ];

    let small = match params.regime {
        CorporateRegime::SmallEnterprise => {
            let tax = small_enterprise_tax(params.revenue);
            if tax.is_none() {
                warn!(
                    turnover = %params.revenue,
                    ceiling = %SMALL_ENTERPRISE_CEILING,
                    "turnover exceeds small-enterprise ceiling; applying standard regime"
                );
                calculations.push(CalculationStep::new(
                    "Small-enterprise regime",
                    "not eligible (turnover above 10,000,000)",
                ));
            }
            tax
        }
        CorporateRegime::Standard => None,
    };

    let (tax, citations) = match small {
        Some(tax) => {
            calculations.push(CalculationStep::new("Annual turnover", params.revenue));
            calculations.push(CalculationStep::new("Small-enterprise tax", tax));
            (tax, laws(&[SMALL_ENTERPRISE_LAW]))
        }
        None => {
            let tax = max(profit, Decimal::ZERO) * CORPORATE_RATE;
            calculations.push(CalculationStep::new(
                format!("Corporate tax ({}%)", percent(CORPORATE_RATE)),
                tax,
            ));
            (tax, laws(&[INCOME_TAX_LAW]))
        }
    };

    let net = profit - tax;
    calculations.push(CalculationStep::new("Profit after tax", net));

    Report {
        summary: format!(
            "Corporate tax of {} on net profit of {}.",
            money(tax),
            money(profit)
        ),
        calculations,
        gross_income: params.revenue,
        total_tax: tax,
        total_insurance: Decimal::ZERO,
        net_income: net,
        applicable_laws: citations,
    }
}

// =============================================================================
// VAT
// =============================================================================

/// Amounts subject to each VAT tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatBuckets {
    #[serde(default)]
    pub rate14: Decimal,
    #[serde(default)]
    pub rate10: Decimal,
    #[serde(default)]
    pub rate5: Decimal,
}

impl VatBuckets {
    pub fn total(&self) -> Decimal {
        self.rate14 + self.rate10 + self.rate5
    }

    /// VAT on every tier, summed.
    pub fn tax(&self) -> Decimal {
        self.rate14 * STANDARD_VAT_RATE + self.rate10 * dec!(0.10) + self.rate5 * dec!(0.05)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatParams {
    pub sales: VatBuckets,
    pub purchases: VatBuckets,
    #[serde(default)]
    pub previous_credit: Decimal,
}

/// Monthly VAT return.
///
/// Net = output tax − input tax − previous credit. A positive net is
/// payable; a negative net becomes credit carried forward. `totalTax` is
/// never negative.
///
/// Report mapping: gross = total sales, tax = VAT payable, net = total
/// sales − payable.
pub fn vat(params: &VatParams) -> Report {
    let output_tax = params.sales.tax();
    let input_tax = params.purchases.tax();
    let net = output_tax - input_tax - params.previous_credit;
    let payable = max(net, Decimal::ZERO);
    let credit = max(-net, Decimal::ZERO);
    let total_sales = params.sales.total();

    let calculations = vec![
        CalculationStep::new("Total sales", total_sales),
        CalculationStep::new("Output tax", output_tax),
        CalculationStep::new("Total purchases", params.purchases.total()),
        CalculationStep::new("Input tax", input_tax),
        CalculationStep::new("Previous credit", params.previous_credit),
        CalculationStep::new("Net VAT", net),
        CalculationStep::new("VAT payable", payable),
        CalculationStep::new("Credit carried forward", credit),
    ];

    let summary = if credit > Decimal::ZERO {
        format!("No VAT due; {} credit carried forward.", money(credit))
    } else {
        format!("VAT payable of {} on sales of {}.", money(payable), money(total_sales))
    };

    Report {
        summary,
        calculations,
        gross_income: total_sales,
        total_tax: payable,
        total_insurance: Decimal::ZERO,
        net_income: total_sales - payable,
        applicable_laws: laws(&[VAT_LAW]),
    }
}

// =============================================================================
// Withholding tax
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithholdingType {
    ContractingSupplies,
    Services,
    CommissionsBrokerage,
    #[serde(other)]
    Other,
}

impl WithholdingType {
    pub fn rate(&self) -> Decimal {
        match self {
            Self::ContractingSupplies | Self::Other => dec!(0.01),
            Self::Services => dec!(0.03),
            Self::CommissionsBrokerage => dec!(0.05),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingTaxParams {
    pub amount: Decimal,
    pub transaction_type: WithholdingType,
}

/// Tax deducted at source from a payment.
///
/// Report mapping: gross = payment, tax = withheld amount, net = amount
/// paid to the supplier.
pub fn withholding_tax(params: &WithholdingTaxParams) -> Report {
    let rate = params.transaction_type.rate();
    let tax = params.amount * rate;
    let net = params.amount - tax;

    Report {
        summary: format!(
            "Withhold {} from a payment of {}; the supplier receives {}.",
            money(tax),
            money(params.amount),
            money(net)
        ),
        calculations: vec![
            CalculationStep::new("Payment amount", params.amount),
            CalculationStep::new(format!("Withholding rate ({}%)", percent(rate)), tax),
            CalculationStep::new("Net payment", net),
        ],
        gross_income: params.amount,
        total_tax: tax,
        total_insurance: Decimal::ZERO,
        net_income: net,
        applicable_laws: laws(&[INCOME_TAX_LAW]),
    }
}

// =============================================================================
// Stamp duty
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StampDutyType {
    BankCredit,
    Advertising,
    InsurancePremium,
    SecuritiesTrade,
    Contract,
    #[serde(other)]
    Other,
}

/// How a stamp-duty type is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampDutyCharge {
    Proportional(Decimal),
    Fixed(Decimal),
}

impl StampDutyType {
    pub fn charge(&self) -> StampDutyCharge {
        match self {
            Self::BankCredit => StampDutyCharge::Proportional(dec!(0.0004)),
            Self::Advertising => StampDutyCharge::Proportional(dec!(0.20)),
            Self::InsurancePremium => StampDutyCharge::Proportional(dec!(0.03)),
            Self::SecuritiesTrade => StampDutyCharge::Proportional(dec!(0.0005)),
            Self::Contract => StampDutyCharge::Fixed(dec!(90)),
            Self::Other => StampDutyCharge::Fixed(dec!(0.90)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampDutyParams {
    pub amount: Decimal,
    pub transaction_type: StampDutyType,
}

/// Report mapping: gross = transaction amount, tax = duty, net = amount −
/// duty.
pub fn stamp_duty(params: &StampDutyParams) -> Report {
    let (tax, basis) = match params.transaction_type.charge() {
        StampDutyCharge::Proportional(rate) => (
            params.amount * rate,
            format!("Proportional duty ({}%)", percent(rate)),
        ),
        StampDutyCharge::Fixed(fee) => (fee, "Fixed duty".to_string()),
    };
    let net = params.amount - tax;

    Report {
        summary: format!(
            "Stamp duty of {} on a transaction of {}.",
            money(tax),
            money(params.amount)
        ),
        calculations: vec![
            CalculationStep::new("Transaction amount", params.amount),
            CalculationStep::new(basis, tax),
            CalculationStep::new("Amount after duty", net),
        ],
        gross_income: params.amount,
        total_tax: tax,
        total_insurance: Decimal::ZERO,
        net_income: net,
        applicable_laws: laws(&[STAMP_DUTY_LAW]),
    }
}

// =============================================================================
// Customs
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoodsCategory {
    Electronics,
    Clothing,
    Cars,
    Food,
    #[serde(other)]
    Other,
}

impl GoodsCategory {
    pub const ALL: [GoodsCategory; 5] = [
        Self::Electronics,
        Self::Clothing,
        Self::Cars,
        Self::Food,
        Self::Other,
    ];

    pub fn duty_rate(&self) -> Decimal {
        match self {
            Self::Electronics => dec!(0.05),
            Self::Clothing => dec!(0.30),
            Self::Cars => dec!(0.40),
            Self::Food => dec!(0.10),
            Self::Other => dec!(0.20),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomsParams {
    pub shipment_value: Decimal,
    pub category: GoodsCategory,
}

/// Import duty, import VAT and the clearance fee on a shipment.
///
/// Report mapping: gross = shipment value, tax = all fees, net = landed
/// cost (value + fees). Net is therefore never below the shipment value.
pub fn customs(params: &CustomsParams) -> Report {
    let rate = params.category.duty_rate();
    let duty = params.shipment_value * rate;
    let vat_base = params.shipment_value + duty;
    let import_vat = vat_base * STANDARD_VAT_RATE;
    let total_fees = duty + import_vat + CUSTOMS_ANCILLARY_FEE;
    let landed = params.shipment_value + total_fees;

    Report {
        summary: format!(
            "Customs fees of {} bring the landed cost to {}.",
            money(total_fees),
            money(landed)
        ),
        calculations: vec![
            CalculationStep::new("Shipment value", params.shipment_value),
            CalculationStep::new(format!("Customs duty ({}%)", percent(rate)), duty),
            CalculationStep::new("VAT base", vat_base),
            CalculationStep::new(
                format!("Import VAT ({}%)", percent(STANDARD_VAT_RATE)),
                import_vat,
            ),
            CalculationStep::new("Ancillary fees", CUSTOMS_ANCILLARY_FEE),
            CalculationStep::new("Total fees", total_fees),
            CalculationStep::new("Landed cost", landed),
        ],
        gross_income: params.shipment_value,
        total_tax: total_fees,
        total_insurance: Decimal::ZERO,
        net_income: landed,
        applicable_laws: laws(&[CUSTOMS_LAW, VAT_LAW]),
    }
}

// =============================================================================
// Share capital
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareCapitalParams {
    pub authorized_capital: Decimal,
    pub issued_capital: Decimal,
    pub paid_in_capital: Decimal,
    pub number_of_shares: u64,
}

/// Report mapping: gross = issued capital, net = paid-in capital.
pub fn share_capital(params: &ShareCapitalParams) -> Report {
    let par_value = if params.number_of_shares == 0 {
        Decimal::ZERO
    } else {
        params.issued_capital / Decimal::from(params.number_of_shares)
    };
    let unpaid = params.issued_capital - params.paid_in_capital;
    let unissued = params.authorized_capital - params.issued_capital;

    Report {
        summary: format!(
            "Par value of {} per share; {} issued capital remains unpaid.",
            money(par_value),
            money(unpaid)
        ),
        calculations: vec![
            CalculationStep::new("Authorized capital", params.authorized_capital),
            CalculationStep::new("Issued capital", params.issued_capital),
            CalculationStep::new("Paid-in capital", params.paid_in_capital),
            CalculationStep::new("Number of shares", Decimal::from(params.number_of_shares)),
            CalculationStep::new("Par value per share", par_value),
            CalculationStep::new("Unpaid capital", unpaid),
            CalculationStep::new("Unissued capital", unissued),
        ],
        gross_income: params.issued_capital,
        total_tax: Decimal::ZERO,
        total_insurance: Decimal::ZERO,
        net_income: params.paid_in_capital,
        applicable_laws: laws(&[COMPANIES_LAW]),
    }
}

// =============================================================================
// Feasibility
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeasibilityParams {
    pub fixed_costs: Decimal,
    pub variable_cost_per_unit: Decimal,
    pub selling_price_per_unit: Decimal,
}

/// Break-even analysis.
///
/// Report mapping: gross = break-even revenue, net = break-even units.
///
/// # Errors
///
/// Returns [`CalculationError::NonPositiveMargin`] when the selling price
/// does not exceed the variable cost.
pub fn feasibility(params: &FeasibilityParams) -> Result<Report, CalculationError> {
    let margin = params.selling_price_per_unit - params.variable_cost_per_unit;
    if margin <= Decimal::ZERO {
        return Err(CalculationError::NonPositiveMargin {
            selling_price: params.selling_price_per_unit,
            variable_cost: params.variable_cost_per_unit,
        });
    }

    let bep_units = params.fixed_costs / margin;
    let bep_value = bep_units * params.selling_price_per_unit;

    Ok(Report {
        summary: format!(
            "Break-even at {} units, or {} in sales.",
            bep_units.normalize(),
            money(bep_value)
        ),
        calculations: vec![
            CalculationStep::new("Fixed costs", params.fixed_costs),
            CalculationStep::new("Contribution margin per unit", margin),
            CalculationStep::new("Break-even units", bep_units),
            CalculationStep::new("Break-even sales", bep_value),
        ],
        gross_income: bep_value,
        total_tax: Decimal::ZERO,
        total_insurance: Decimal::ZERO,
        net_income: bep_units,
        applicable_laws: Vec::new(),
    })
}
