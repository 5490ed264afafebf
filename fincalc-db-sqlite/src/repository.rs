use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fincalc_core::{
    CalculatorKind, HistoryRecord, HistoryRepository, NewHistoryRecord, RepositoryError,
};
use sqlx::FromRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

/// Connections kept by a file-backed pool.
const FILE_POOL_SIZE: u32 = 5;

pub struct SqliteHistoryRepository {
    pool: SqlitePool,
}

impl SqliteHistoryRepository {
    /// Opens `database_url`, creating the file if needed.
    ///
    /// An in-memory database lives only as long as its connection, so it
    /// gets a single connection that is never recycled.
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RepositoryError::Configuration(e.to_string()))?
            .create_if_missing(true);

        let in_memory = database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(FILE_POOL_SIZE)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        debug!(url = database_url, in_memory, "opened sqlite history store");
        Ok(Self { pool })
    }

    /// Wraps a pool the caller has already configured. Migrations are not
    /// run.
    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[derive(FromRow)]
struct HistoryRow {
    id: i64,
    calculator: String,
    params_json: String,
    report_json: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<HistoryRow> for HistoryRecord {
    type Error = RepositoryError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let calculator = row
            .calculator
            .parse::<CalculatorKind>()
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let params = serde_json::from_str(&row.params_json).map_err(|e| {
            RepositoryError::Serialization(format!("params of record {}: {}", row.id, e))
        })?;
        let report = serde_json::from_str(&row.report_json).map_err(|e| {
            RepositoryError::Serialization(format!("report of record {}: {}", row.id, e))
        })?;

        Ok(HistoryRecord {
            id: row.id,
            calculator,
            params,
            report,
            created_at: row.created_at,
        })
    }
}

const SELECT_HISTORY: &str =
    "SELECT id, calculator, params_json, report_json, created_at FROM history";

#[async_trait]
impl HistoryRepository for SqliteHistoryRepository {
    async fn save(
        &self,
        record: NewHistoryRecord,
    ) -> Result<HistoryRecord, RepositoryError> {
        let now = Utc::now();
        let calculator = record.calculator();
        let params_json = serde_json::to_string(&record.params)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let report_json = serde_json::to_string(&record.report)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO history (calculator, summary, params_json, report_json, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(calculator.as_str())
        .bind(&record.report.summary)
        .bind(params_json)
        .bind(report_json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        debug!(id, %calculator, "saved calculation");
        self.get(id).await
    }

    async fn get(
        &self,
        id: i64,
    ) -> Result<HistoryRecord, RepositoryError> {
        let row = sqlx::query_as::<_, HistoryRow>(&format!("{SELECT_HISTORY} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn list(
        &self,
        calculator: Option<CalculatorKind>,
    ) -> Result<Vec<HistoryRecord>, RepositoryError> {
        let rows = match calculator {
            Some(kind) => {
                sqlx::query_as::<_, HistoryRow>(&format!(
                    "{SELECT_HISTORY} WHERE calculator = ? ORDER BY created_at DESC, id DESC"
                ))
                .bind(kind.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, HistoryRow>(&format!(
                    "{SELECT_HISTORY} ORDER BY created_at DESC, id DESC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(HistoryRecord::try_from).collect()
    }

    async fn delete(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM history WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
