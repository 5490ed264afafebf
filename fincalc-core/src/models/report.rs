use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The amount column of a calculation step: a figure, or a label such as
/// a fraction (`"1/4"`) or a yes/no verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepAmount {
    Value(Decimal),
    Text(String),
}

impl From<Decimal> for StepAmount {
    fn from(value: Decimal) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for StepAmount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StepAmount {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One line of the audit trail. Order within a report is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationStep {
    pub description: String,
    pub amount: StepAmount,
}

impl CalculationStep {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<StepAmount>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
        }
    }

    /// Returns the numeric amount, if this step carries one.
    pub fn value(&self) -> Option<Decimal> {
        match self.amount {
            StepAmount::Value(v) => Some(v),
            StepAmount::Text(_) => None,
        }
    }
}

/// Output of every calculator.
///
/// The four totals keep the field mapping the report renderer expects.
/// Several calculators reuse `total_tax` or `net_income` for an analogous
/// figure (a cost, a benefit, a liability); each calculator documents its
/// own mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub summary: String,
    pub calculations: Vec<CalculationStep>,
    pub gross_income: Decimal,
    pub total_tax: Decimal,
    pub total_insurance: Decimal,
    pub net_income: Decimal,
    pub applicable_laws: Vec<String>,
}

impl Report {
    /// Looks up the first step whose description starts with `prefix`.
    pub fn step(
        &self,
        prefix: &str,
    ) -> Option<&CalculationStep> {
        self.calculations
            .iter()
            .find(|s| s.description.starts_with(prefix))
    }
}
