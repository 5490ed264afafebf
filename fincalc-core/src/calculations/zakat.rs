//! Zakat on monetary wealth.
//!
//! The nisab is the value of 85 grams of gold. Zakat of 2.5% is due on the
//! whole zakatable pool only when it strictly exceeds the nisab.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{laws, money, percent};
use crate::models::{CalculationStep, Report};

pub const NISAB_GOLD_GRAMS: Decimal = dec!(85);
pub const ZAKAT_RATE: Decimal = dec!(0.025);

const LAWS: &[&str] = &["Law No. 123 of 2021 establishing the House of Zakat and Charity"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZakatParams {
    pub cash: Decimal,
    pub stocks: Decimal,
    pub trade_goods: Decimal,
    pub debts: Decimal,
    pub gold_price_per_gram: Decimal,
}

/// Report mapping: gross = zakatable pool, tax = zakat due, net = pool −
/// zakat.
pub fn zakat(params: &ZakatParams) -> Report {
    let nisab = params.gold_price_per_gram * NISAB_GOLD_GRAMS;
    let pool = params.cash + params.stocks + params.trade_goods - params.debts;
    let due = pool > nisab;
    let amount = if due { pool * ZAKAT_RATE } else { Decimal::ZERO };

    let summary = if due {
        format!("Zakat of {} is due on wealth of {}.", money(amount), money(pool))
    } else {
        format!(
            "No zakat due: wealth of {} does not exceed the nisab of {}.",
            money(pool),
            money(nisab)
        )
    };

    Report {
        summary,
        calculations: vec![
            CalculationStep::new("Cash", params.cash),
            CalculationStep::new("Stocks", params.stocks),
            CalculationStep::new("Trade goods", params.trade_goods),
            CalculationStep::new("Debts", params.debts),
            CalculationStep::new("Zakatable wealth", pool),
            CalculationStep::new(
                format!("Nisab ({NISAB_GOLD_GRAMS} g of gold)"),
                nisab,
            ),
            CalculationStep::new("Nisab reached", if due { "yes" } else { "no" }),
            CalculationStep::new(format!("Zakat due ({}%)", percent(ZAKAT_RATE)), amount),
        ],
        gross_income: pool,
        total_tax: amount,
        total_insurance: Decimal::ZERO,
        net_income: pool - amount,
        applicable_laws: laws(LAWS),
    }
}
