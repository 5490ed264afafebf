use std::collections::BTreeMap;
use std::io::Read;

use fincalc_core::rates::validate_tax_table;
use fincalc_core::{RateTableError, RateTables, TaxBracket, TaxTable};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading income-tax bracket overrides.
#[derive(Debug, Error, PartialEq)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("tax year {year}: personal exemption {found} differs from {expected} on an earlier row")]
    InconsistentExemption {
        year: i32,
        expected: Decimal,
        found: Decimal,
    },

    #[error(transparent)]
    RateTable(#[from] RateTableError),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the bracket overrides CSV.
///
/// - `tax_year`: the year the row applies to (e.g., 2026)
/// - `personal_exemption`: annual exemption, repeated on every row of a year
/// - `width`: how much income the bracket covers (empty for the open top bracket)
/// - `rate`: the marginal rate as a decimal (e.g., 0.10 for 10%)
///
/// Rows of one year are brackets in ascending order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub personal_exemption: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub width: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for income-tax bracket overrides from CSV files.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into one validated [`TaxTable`] per year, keeping
    /// file order within each year.
    pub fn tables(records: &[BracketRecord]) -> Result<BTreeMap<i32, TaxTable>, BracketLoaderError> {
        let mut tables: BTreeMap<i32, TaxTable> = BTreeMap::new();

        for record in records {
            let table = tables.entry(record.tax_year).or_insert_with(|| TaxTable {
                personal_exemption: record.personal_exemption,
                brackets: Vec::new(),
            });
            if table.personal_exemption != record.personal_exemption {
                return Err(BracketLoaderError::InconsistentExemption {
                    year: record.tax_year,
                    expected: table.personal_exemption,
                    found: record.personal_exemption,
                });
            }
            table.brackets.push(TaxBracket {
                width: record.width,
                rate: record.rate,
            });
        }

        for (&year, table) in &tables {
            validate_tax_table(year, table)?;
        }

        Ok(tables)
    }

    /// Replace the income-tax tables in `rates` with the parsed ones.
    ///
    /// Years without a built-in entry take their insurance and electricity
    /// tables from the fallback year.
    pub fn apply(
        rates: RateTables,
        records: &[BracketRecord],
    ) -> Result<RateTables, BracketLoaderError> {
        let mut rates = rates;
        for (year, table) in Self::tables(records)? {
            info!(year, brackets = table.brackets.len(), "applying income tax override");
            rates = rates.with_income_tax(year, table)?;
        }
        Ok(rates)
    }
}
