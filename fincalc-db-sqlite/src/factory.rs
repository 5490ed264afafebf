use async_trait::async_trait;
use fincalc_core::db::{DbConfig, HistoryRepository, RepositoryError, RepositoryFactory};

use crate::repository::SqliteHistoryRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`fincalc_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use fincalc_core::db::RepositoryRegistry;
/// use fincalc_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and bring
    /// its schema up to date.
    ///
    /// The connection string is a sqlx SQLite URL, e.g.
    /// `sqlite:fincalc.db?mode=rwc` or `sqlite::memory:`.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn HistoryRepository>, RepositoryError> {
        let repo = SqliteHistoryRepository::new(&config.connection_string).await?;
        repo.run_migrations().await?;
        Ok(Box::new(repo))
    }
}
