mod electricity_tariff;
mod history;
mod insurance_params;
mod report;
mod tax_table;
mod year_rates;

pub use electricity_tariff::{ElectricityBracket, ElectricityTariff, ElectricityTariffs, MeterType};
pub use history::{HistoryRecord, NewHistoryRecord};
pub use insurance_params::InsuranceParams;
pub use report::{CalculationStep, Report, StepAmount};
pub use tax_table::{TaxBracket, TaxTable};
pub use year_rates::YearRates;
