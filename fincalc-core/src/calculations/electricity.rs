//! Tiered electricity billing.
//!
//! Tariff limits are cumulative: a residential limit of `100` after `50`
//! means kWh 51 to 100 are billed at that tier's rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{laws, money};
use crate::models::{CalculationStep, ElectricityTariff, MeterType, Report};
use crate::rates::RateTables;

const LAWS: &[&str] = &["Electricity Law No. 87 of 2015"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectricityParams {
    pub consumption_kwh: Decimal,
    pub meter_type: MeterType,
    pub year: i32,
}

/// Energy charge for `consumption`, with one step per tier reached.
pub fn energy_charge(
    consumption: Decimal,
    tariff: &ElectricityTariff,
    steps: &mut Vec<CalculationStep>,
) -> Decimal {
    let mut billed = Decimal::ZERO;
    let mut charge = Decimal::ZERO;

    for (index, bracket) in tariff.brackets.iter().enumerate() {
        let upper = match bracket.limit {
            Some(limit) => consumption.min(limit),
            None => consumption,
        };
        let used = upper - billed;
        if used <= Decimal::ZERO {
            break;
        }
        let cost = used * bracket.rate;
        steps.push(CalculationStep::new(
            format!("Tier {}: {} kWh at {} EGP", index + 1, used, bracket.rate),
            cost,
        ));
        charge += cost;
        billed = upper;
    }

    charge
}

/// Monthly electricity bill.
///
/// Report mapping: gross = energy charge, tax = service fee, net = total
/// bill.
pub fn electricity(
    params: &ElectricityParams,
    rates: &RateTables,
) -> Report {
    let tariff = rates
        .lookup(params.year)
        .electricity
        .for_meter(params.meter_type);

    let mut calculations = vec![CalculationStep::new(
        format!("Consumption ({} meter, kWh)", params.meter_type.as_str()),
        params.consumption_kwh,
    )];
    let charge = energy_charge(params.consumption_kwh, tariff, &mut calculations);
    let total = charge + tariff.service_fee;
    calculations.push(CalculationStep::new("Energy charge", charge));
    calculations.push(CalculationStep::new("Service fee", tariff.service_fee));
    calculations.push(CalculationStep::new("Total bill", total));

    Report {
        summary: format!(
            "Electricity bill of {} for {} kWh.",
            money(total),
            params.consumption_kwh
        ),
        calculations,
        gross_income: charge,
        total_tax: tariff.service_fee,
        total_insurance: Decimal::ZERO,
        net_income: total,
        applicable_laws: laws(LAWS),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn bill(
        kwh: Decimal,
        meter_type: MeterType,
    ) -> Report {
        electricity(
            &ElectricityParams {
                consumption_kwh: kwh,
                meter_type,
                year: 2024,
            },
            &RateTables::builtin(),
        )
    }

    #[test]
    fn residential_spans_three_tiers() {
        let report = bill(dec!(120), MeterType::Residential);

        // 50 × 0.68 + 50 × 0.78 + 20 × 0.95
        assert_eq!(report.gross_income, dec!(92));
        assert_eq!(report.total_tax, dec!(10));
        assert_eq!(report.net_income, dec!(102));
        assert_eq!(report.step("Tier 3").and_then(|s| s.value()), Some(dec!(19)));
        assert!(report.step("Tier 4").is_none());
    }

    #[test]
    fn commercial_tariff_and_fee() {
        let report = bill(dec!(300), MeterType::Commercial);

        // 100 × 0.85 + 150 × 1.68 + 50 × 1.83
        assert_eq!(report.gross_income, dec!(428.5));
        assert_eq!(report.net_income, dec!(448.5));
    }

    #[test]
    fn consumption_past_last_limit_uses_open_tier() {
        let report = bill(dec!(1100), MeterType::Residential);

        assert_eq!(report.step("Tier 7").and_then(|s| s.value()), Some(dec!(223)));
    }

    #[test]
    fn zero_consumption_pays_service_fee_only() {
        let report = bill(Decimal::ZERO, MeterType::Residential);

        assert_eq!(report.gross_income, Decimal::ZERO);
        assert_eq!(report.net_income, dec!(10));
    }
}
