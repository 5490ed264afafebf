use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Report;
use crate::calculator::{CalculatorKind, CalculatorParams};

/// A persisted calculation: the parameters the caller supplied and the
/// report the engine returned for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub calculator: CalculatorKind,
    pub params: CalculatorParams,
    pub report: Report,
    pub created_at: DateTime<Utc>,
}

/// For saving new records (no id or timestamp)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHistoryRecord {
    pub params: CalculatorParams,
    pub report: Report,
}

impl NewHistoryRecord {
    pub fn new(
        params: CalculatorParams,
        report: Report,
    ) -> Self {
        Self { params, report }
    }

    pub fn calculator(&self) -> CalculatorKind {
        self.params.kind()
    }
}
