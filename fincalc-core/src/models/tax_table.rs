use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One slice of the progressive income-tax schedule.
///
/// `width` is the size of this slice, not a cumulative ceiling. `None`
/// marks the open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub width: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(width: Decimal, rate: Decimal) -> Self {
        Self {
            width: Some(width),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self { width: None, rate }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTable {
    pub personal_exemption: Decimal,
    pub brackets: Vec<TaxBracket>,
}

impl TaxTable {
    /// Sum of all bracket widths, or `None` when the schedule is open-ended.
    pub fn capacity(&self) -> Option<Decimal> {
        self.brackets
            .iter()
            .try_fold(Decimal::ZERO, |acc, b| b.width.map(|w| acc + w))
    }
}
