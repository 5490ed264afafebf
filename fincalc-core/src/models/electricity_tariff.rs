use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterType {
    Residential,
    Commercial,
}

impl MeterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
        }
    }
}

/// A consumption tier. `limit` is the cumulative upper bound in kWh;
/// `None` marks the open-ended last tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectricityBracket {
    pub limit: Option<Decimal>,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectricityTariff {
    pub brackets: Vec<ElectricityBracket>,
    pub service_fee: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectricityTariffs {
    pub residential: ElectricityTariff,
    pub commercial: ElectricityTariff,
}

impl ElectricityTariffs {
    pub fn for_meter(&self, meter: MeterType) -> &ElectricityTariff {
        match meter {
            MeterType::Residential => &self.residential,
            MeterType::Commercial => &self.commercial,
        }
    }
}
