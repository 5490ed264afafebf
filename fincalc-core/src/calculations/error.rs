use rust_decimal::Decimal;
use thiserror::Error;

/// Errors a calculator raises when its result would be undefined.
///
/// Callers map [`CalculationError::message_key`] to a localized message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// Selling price does not exceed variable cost, so break-even is
    /// unreachable.
    #[error(
        "selling price {selling_price} must exceed variable cost {variable_cost} per unit"
    )]
    NonPositiveMargin {
        selling_price: Decimal,
        variable_cost: Decimal,
    },

    #[error("invalid input: {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// An intermediate figure left the representable decimal range, e.g.
    /// a very long horizon compounded at a high rate.
    #[error("{field} is too large to compute")]
    Overflow { field: &'static str },
}

impl CalculationError {
    /// Stable key identifying the failure, independent of the message text.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::NonPositiveMargin { .. } => "errors.feasibility.margin",
            Self::InvalidInput { .. } => "errors.invalid_input",
            Self::Overflow { .. } => "errors.overflow",
        }
    }
}
