use async_trait::async_trait;
use thiserror::Error;

use crate::calculator::CalculatorKind;
use crate::models::{HistoryRecord, NewHistoryRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    /// The requested backend is unknown or its settings are unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A stored parameter or report record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Storage for past calculations.
///
/// The calculators never touch this; callers save the parameters they
/// submitted together with the report they got back.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn save(
        &self,
        record: NewHistoryRecord,
    ) -> Result<HistoryRecord, RepositoryError>;

    async fn get(
        &self,
        id: i64,
    ) -> Result<HistoryRecord, RepositoryError>;

    /// Newest first, optionally restricted to one calculator.
    async fn list(
        &self,
        calculator: Option<CalculatorKind>,
    ) -> Result<Vec<HistoryRecord>, RepositoryError>;

    async fn delete(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError>;
}
