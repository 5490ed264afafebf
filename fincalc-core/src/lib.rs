pub mod calculations;
pub mod calculator;
pub mod db;
pub mod models;
pub mod rates;

pub use calculations::CalculationError;
pub use calculator::{Calculator, CalculatorKind, CalculatorParams};
pub use db::repository::{HistoryRepository, RepositoryError};
pub use models::*;
pub use rates::{RateTableError, RateTables};
