//! Quote operations as seen by a signed-in user.
//!
//! The service is where validation, the admin gate and tenant scoping meet
//! the repository. It also refreshes the margin suggestions before every
//! write so stored records never carry stale ones.

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::auth::{AuthError, Identity};
use crate::calculations::recompute;
use crate::db::{QuoteRepository, RepositoryError};
use crate::listing::{QuoteFilter, filter_quotes};
use crate::models::{NewQuote, Quote, QuoteStatus};
use crate::validation::{QuoteDraft, ValidationError, assign_identity, require_id, validate_quote};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub struct QuoteService {
    repository: Box<dyn QuoteRepository>,
    identity: Identity,
}

impl QuoteService {
    pub fn new(
        repository: Box<dyn QuoteRepository>,
        identity: Identity,
    ) -> Self {
        Self {
            repository,
            identity,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Validates and stores a new quote under the caller's company.
    pub async fn save(
        &self,
        draft: QuoteDraft,
    ) -> Result<Quote, ServiceError> {
        validate_quote(&draft)?;

        let mut pricing = recompute(None, &draft.pricing);
        assign_identity(&mut pricing, Utc::now());
        pricing.workflow.created_by = Some(self.identity.user_id.clone());

        let quote = self
            .repository
            .create_quote(
                &self.identity.company,
                NewQuote {
                    company: self.identity.company.clone(),
                    details: draft.details,
                    pricing,
                },
            )
            .await?;

        info!(
            company = %self.identity.company,
            id = quote.id,
            business_id = ?quote.pricing.workflow.id,
            "quote saved"
        );
        Ok(quote)
    }

    /// Rewrites an existing quote and sends it back for review.
    pub async fn update(
        &self,
        mut quote: Quote,
    ) -> Result<Quote, ServiceError> {
        require_id(&quote.pricing)?;

        let draft = QuoteDraft {
            details: quote.details.clone(),
            pricing: quote.pricing.clone(),
        };
        validate_quote(&draft)?;

        quote.company = self.identity.company.clone();
        quote.pricing = recompute(None, &quote.pricing);
        quote.pricing.workflow.remote_status = QuoteStatus::Awaiting;

        self.repository.update_quote(&quote).await?;
        info!(company = %self.identity.company, id = quote.id, "quote updated");

        Ok(self.repository.get_quote(&self.identity.company, quote.id).await?)
    }

    pub async fn get(
        &self,
        id: i64,
    ) -> Result<Quote, ServiceError> {
        Ok(self.repository.get_quote(&self.identity.company, id).await?)
    }

    /// Quotes under the filter's tab matching its search term, newest first.
    pub async fn list(
        &self,
        filter: &QuoteFilter,
    ) -> Result<Vec<Quote>, ServiceError> {
        let quotes = self
            .repository
            .list_quotes(&self.identity.company, filter.tab.status())
            .await?;

        Ok(filter_quotes(&quotes, filter).into_iter().cloned().collect())
    }

    /// Employees may only send a quote back to `Awaiting`.
    pub async fn set_status(
        &self,
        id: i64,
        status: QuoteStatus,
    ) -> Result<(), ServiceError> {
        if status != QuoteStatus::Awaiting {
            self.identity.require_admin("changing quote status")?;
        }

        self.repository
            .update_status(&self.identity.company, id, status)
            .await?;
        info!(
            company = %self.identity.company,
            id,
            status = status.as_str(),
            "quote status changed"
        );
        Ok(())
    }

    pub async fn delete(
        &self,
        id: i64,
    ) -> Result<(), ServiceError> {
        self.identity.require_admin("deleting a quote")?;

        self.repository.delete_quote(&self.identity.company, id).await?;
        info!(company = %self.identity.company, id, "quote deleted");
        Ok(())
    }
}
