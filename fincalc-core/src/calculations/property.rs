//! Property and disposal taxes: the annual built-property tax, the tax on
//! real-estate sales and capital gains.
//!
//! The annual real-estate tax reports its liability as a negative
//! `net_income`, since the owner receives nothing from it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{laws, max, money, percent};
use crate::models::{CalculationStep, Report};

/// Annual rental value as a share of market value.
pub const RENTAL_VALUE_RATE: Decimal = dec!(0.03);
/// Yearly exemption for an owner's primary residential home.
pub const PRIMARY_RESIDENCE_EXEMPTION: Decimal = dec!(24000);
pub const REAL_ESTATE_TAX_RATE: Decimal = dec!(0.10);
pub const TRANSACTION_TAX_RATE: Decimal = dec!(0.025);
pub const CAPITAL_GAINS_RATE: Decimal = dec!(0.10);

const REAL_ESTATE_LAW: &str = "Real Estate Tax Law No. 196 of 2008";
const INCOME_TAX_LAW: &str = "Income Tax Law No. 91 of 2005";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Residential,
    NonResidential,
}

impl PropertyType {
    /// Maintenance allowance deducted from the rental value.
    pub fn maintenance_rate(&self) -> Decimal {
        match self {
            Self::Residential => dec!(0.30),
            Self::NonResidential => dec!(0.32),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealEstateTaxParams {
    pub market_value: Decimal,
    pub property_type: PropertyType,
    #[serde(default)]
    pub primary_residence: bool,
}

/// Annual tax on built property.
///
/// Report mapping: gross = annual rental value, tax = real-estate tax,
/// net = −tax.
pub fn real_estate_tax(params: &RealEstateTaxParams) -> Report {
    let rental_value = params.market_value * RENTAL_VALUE_RATE;
    let maintenance_rate = params.property_type.maintenance_rate();
    let maintenance = rental_value * maintenance_rate;
    let net_rental = rental_value - maintenance;

    let exempt = params.property_type == PropertyType::Residential && params.primary_residence;
    let exemption = if exempt {
        PRIMARY_RESIDENCE_EXEMPTION
    } else {
        Decimal::ZERO
    };
    let taxable = max(net_rental - exemption, Decimal::ZERO);
    let tax = taxable * REAL_ESTATE_TAX_RATE;

    Report {
        summary: format!(
            "Annual real-estate tax of {} on a property valued at {}.",
            money(tax),
            money(params.market_value)
        ),
        calculations: vec![
            CalculationStep::new("Market value", params.market_value),
            CalculationStep::new(
                format!("Annual rental value ({}%)", percent(RENTAL_VALUE_RATE)),
                rental_value,
            ),
            CalculationStep::new(
                format!("Maintenance deduction ({}%)", percent(maintenance_rate)),
                maintenance,
            ),
            CalculationStep::new("Net rental value", net_rental),
            CalculationStep::new("Primary residence exemption", exemption),
            CalculationStep::new("Taxable value", taxable),
            CalculationStep::new(
                format!("Real-estate tax ({}%)", percent(REAL_ESTATE_TAX_RATE)),
                tax,
            ),
        ],
        gross_income: rental_value,
        total_tax: tax,
        total_insurance: Decimal::ZERO,
        net_income: -tax,
        applicable_laws: laws(&[REAL_ESTATE_LAW]),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealEstateTransactionParams {
    pub sale_value: Decimal,
}

/// Flat tax on the gross value of a real-estate sale.
///
/// Report mapping: gross = sale value, net = sale value − tax.
pub fn real_estate_transaction_tax(params: &RealEstateTransactionParams) -> Report {
    let tax = params.sale_value * TRANSACTION_TAX_RATE;
    let net = params.sale_value - tax;

    Report {
        summary: format!(
            "Transaction tax of {} on a sale of {}.",
            money(tax),
            money(params.sale_value)
        ),
        calculations: vec![
            CalculationStep::new("Sale value", params.sale_value),
            CalculationStep::new(
                format!("Transaction tax ({}%)", percent(TRANSACTION_TAX_RATE)),
                tax,
            ),
            CalculationStep::new("Proceeds after tax", net),
        ],
        gross_income: params.sale_value,
        total_tax: tax,
        total_insurance: Decimal::ZERO,
        net_income: net,
        applicable_laws: laws(&[INCOME_TAX_LAW]),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainsParams {
    pub selling_price: Decimal,
    pub purchase_price: Decimal,
    #[serde(default)]
    pub costs: Decimal,
}

/// Report mapping: gross = selling price, net = profit − tax. A loss is
/// reported as negative net and owes nothing.
pub fn capital_gains_tax(params: &CapitalGainsParams) -> Report {
    let profit = params.selling_price - params.purchase_price - params.costs;
    let tax = if profit > Decimal::ZERO {
        profit * CAPITAL_GAINS_RATE
    } else {
        Decimal::ZERO
    };
    let net = profit - tax;

    Report {
        summary: format!(
            "Capital gains tax of {} on a net gain of {}.",
            money(tax),
            money(profit)
        ),
        calculations: vec![
            CalculationStep::new("Selling price", params.selling_price),
            CalculationStep::new("Purchase price", params.purchase_price),
            CalculationStep::new("Costs", params.costs),
            CalculationStep::new("Net profit", profit),
            CalculationStep::new(
                format!("Capital gains tax ({}%)", percent(CAPITAL_GAINS_RATE)),
                tax,
            ),
            CalculationStep::new("Profit after tax", net),
        ],
        gross_income: params.selling_price,
        total_tax: tax,
        total_insurance: Decimal::ZERO,
        net_income: net,
        applicable_laws: laws(&[INCOME_TAX_LAW]),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, proptest};

    use super::*;

    #[test]
    fn real_estate_primary_residence_gets_exemption() {
        let report = real_estate_tax(&RealEstateTaxParams {
            market_value: dec!(2000000),
            property_type: PropertyType::Residential,
            primary_residence: true,
        });

        // Rental 60000, maintenance 18000, net 42000, taxable 18000
        assert_eq!(report.gross_income, dec!(60000));
        assert_eq!(report.total_tax, dec!(1800));
        assert_eq!(report.net_income, dec!(-1800));
    }

    #[test]
    fn real_estate_non_residential_has_no_exemption() {
        let report = real_estate_tax(&RealEstateTaxParams {
            market_value: dec!(2000000),
            property_type: PropertyType::NonResidential,
            primary_residence: true,
        });

        // Rental 60000, maintenance 19200, taxable 40800
        assert_eq!(report.total_tax, dec!(4080));
    }

    #[test]
    fn real_estate_small_home_is_fully_exempt() {
        let report = real_estate_tax(&RealEstateTaxParams {
            market_value: dec!(500000),
            property_type: PropertyType::Residential,
            primary_residence: true,
        });

        assert_eq!(report.total_tax, Decimal::ZERO);
        assert_eq!(report.net_income, Decimal::ZERO);
    }

    #[test]
    fn transaction_tax_is_flat() {
        let report = real_estate_transaction_tax(&RealEstateTransactionParams {
            sale_value: dec!(1000000),
        });

        assert_eq!(report.total_tax, dec!(25000));
        assert_eq!(report.net_income, dec!(975000));
    }

    #[test]
    fn capital_gains_taxes_positive_profit() {
        let report = capital_gains_tax(&CapitalGainsParams {
            selling_price: dec!(150000),
            purchase_price: dec!(100000),
            costs: dec!(5000),
        });

        assert_eq!(report.total_tax, dec!(4500));
        assert_eq!(report.net_income, dec!(40500));
    }

    #[test]
    fn capital_loss_owes_nothing() {
        let report = capital_gains_tax(&CapitalGainsParams {
            selling_price: dec!(90000),
            purchase_price: dec!(100000),
            costs: Decimal::ZERO,
        });

        assert_eq!(report.total_tax, Decimal::ZERO);
        assert_eq!(report.net_income, dec!(-10000));
    }

    proptest! {
        #[test]
        fn prop_real_estate_net_is_never_positive(
            value in 0u64..100_000_000u64,
            residential: bool,
            primary: bool,
        ) {
            let report = real_estate_tax(&RealEstateTaxParams {
                market_value: Decimal::from(value),
                property_type: if residential {
                    PropertyType::Residential
                } else {
                    PropertyType::NonResidential
                },
                primary_residence: primary,
            });

            prop_assert!(report.net_income <= Decimal::ZERO);
            prop_assert!(report.total_tax >= Decimal::ZERO);
        }
    }
}
