use serde::{Deserialize, Serialize};

use super::{ElectricityTariffs, InsuranceParams, TaxTable};

/// Every rate table that applies to one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRates {
    pub income_tax: TaxTable,
    pub insurance: InsuranceParams,
    pub electricity: ElectricityTariffs,
}
