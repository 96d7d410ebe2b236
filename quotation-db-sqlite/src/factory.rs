use async_trait::async_trait;
use quotation_core::db::{DbConfig, QuoteRepository, RepositoryError, RepositoryFactory};

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`quotation_core::db::RepositoryRegistry`] to make
/// the `"sqlite"` backend available:
///
/// ```rust,no_run
/// use quotation_core::db::RepositoryRegistry;
/// use quotation_db_sqlite::SqliteRepositoryFactory;
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

    /// Opens `config.connection_string` and applies migrations.
    ///
    /// Accepts a bare file path such as `"quotes.db"` (created if missing),
    /// a `sqlite:` URL, or `":memory:"`.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn QuoteRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        Ok(Box::new(repo))
    }
}
