use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Social insurance parameters for a single year.
///
/// `min_wage` and `max_wage` bound the monthly contribution wage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceParams {
    pub min_wage: Decimal,
    pub max_wage: Decimal,
    pub employee_rate: Decimal,
    pub employer_rate: Decimal,
}
