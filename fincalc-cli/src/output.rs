use std::fmt;

use clap::ValueEnum;
use fincalc_core::calculations::common::{percent, round_half_up};
use fincalc_core::{HistoryRecord, Report, StepAmount, YearRates};
use rust_decimal::Decimal;
use serde::Serialize;

/// How command results are written to stdout.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, human-readable tables
    #[default]
    Text,
    /// Pretty-printed JSON, amounts as decimal strings
    Json,
}

const LABEL_WIDTH: usize = 52;
const AMOUNT_WIDTH: usize = 18;

fn amount(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

fn step_amount(value: &StepAmount) -> String {
    match value {
        StepAmount::Value(v) => amount(*v),
        StepAmount::Text(t) => t.clone(),
    }
}

/// Text rendering of a [`Report`].
pub struct ReportText<'a>(pub &'a Report);

impl fmt::Display for ReportText<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let report = self.0;
        writeln!(f, "{}", report.summary)?;
        writeln!(f)?;
        for step in &report.calculations {
            writeln!(
                f,
                "  {:<LABEL_WIDTH$} {:>AMOUNT_WIDTH$}",
                step.description,
                step_amount(&step.amount)
            )?;
        }
        writeln!(f)?;
        for (label, value) in [
            ("Gross income", report.gross_income),
            ("Total tax", report.total_tax),
            ("Total insurance", report.total_insurance),
            ("Net income", report.net_income),
        ] {
            writeln!(f, "  {label:<LABEL_WIDTH$} {:>AMOUNT_WIDTH$}", amount(value))?;
        }
        if !report.applicable_laws.is_empty() {
            writeln!(f)?;
            writeln!(f, "Applicable laws:")?;
            for law in &report.applicable_laws {
                writeln!(f, "  - {law}")?;
            }
        }
        Ok(())
    }
}

/// One line per record: id, timestamp, calculator, summary.
pub struct HistoryText<'a>(pub &'a [HistoryRecord]);

impl fmt::Display for HistoryText<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No saved calculations.");
        }
        for record in self.0 {
            writeln!(
                f,
                "{:>6}  {}  {:<28} {}",
                record.id,
                record.created_at.format("%Y-%m-%d %H:%M:%S"),
                record.calculator,
                record.report.summary
            )?;
        }
        Ok(())
    }
}

/// The tables in force for one year.
#[derive(Debug, Serialize)]
pub struct RatesView<'a> {
    pub requested_year: i32,
    pub resolved_year: i32,
    pub rates: &'a YearRates,
}

impl fmt::Display for RatesView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.requested_year == self.resolved_year {
            writeln!(f, "Rate tables for {}", self.resolved_year)?;
        } else {
            writeln!(
                f,
                "Rate tables for {} (no table for {})",
                self.resolved_year, self.requested_year
            )?;
        }

        let income = &self.rates.income_tax;
        writeln!(f)?;
        writeln!(f, "Income tax, personal exemption {}", amount(income.personal_exemption))?;
        for bracket in &income.brackets {
            let width = bracket.width.map_or_else(|| "remainder".to_string(), amount);
            writeln!(f, "  {width:>18}  at {}%", percent(bracket.rate))?;
        }

        let insurance = &self.rates.insurance;
        writeln!(f)?;
        writeln!(
            f,
            "Social insurance wage {} to {} per month, employee {}%, employer {}%",
            amount(insurance.min_wage),
            amount(insurance.max_wage),
            percent(insurance.employee_rate),
            percent(insurance.employer_rate)
        )?;

        for (meter, tariff) in [
            ("Residential", &self.rates.electricity.residential),
            ("Commercial", &self.rates.electricity.commercial),
        ] {
            writeln!(f)?;
            writeln!(f, "{meter} electricity, service fee {}", amount(tariff.service_fee))?;
            for bracket in &tariff.brackets {
                let limit = bracket
                    .limit
                    .map_or_else(|| "above".to_string(), |l| format!("up to {l} kWh"));
                writeln!(f, "  {limit:>18}  {} EGP/kWh", bracket.rate)?;
            }
        }
        Ok(())
    }
}

/// Renders `value` as pretty JSON, or through its text form.
pub fn render<T, D>(
    value: &T,
    text: D,
    format: OutputFormat,
) -> Result<String, serde_json::Error>
where
    T: Serialize + ?Sized,
    D: fmt::Display,
{
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value),
        OutputFormat::Text => Ok(text.to_string()),
    }
}
