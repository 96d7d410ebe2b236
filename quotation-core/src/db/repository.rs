use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewQuote, Quote, QuoteStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for quotes. Every call is scoped to one company.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn create_quote(
        &self,
        company: &str,
        quote: NewQuote,
    ) -> Result<Quote, RepositoryError>;

    async fn get_quote(
        &self,
        company: &str,
        id: i64,
    ) -> Result<Quote, RepositoryError>;

    /// Newest first, optionally only one remote status.
    async fn list_quotes(
        &self,
        company: &str,
        status: Option<QuoteStatus>,
    ) -> Result<Vec<Quote>, RepositoryError>;

    async fn update_quote(
        &self,
        quote: &Quote,
    ) -> Result<(), RepositoryError>;

    async fn update_status(
        &self,
        company: &str,
        id: i64,
        status: QuoteStatus,
    ) -> Result<(), RepositoryError>;

    async fn delete_quote(
        &self,
        company: &str,
        id: i64,
    ) -> Result<(), RepositoryError>;
}
