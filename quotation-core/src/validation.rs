//! Checks applied before a quote is saved or updated.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CalculationState, QuoteDetails};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("product cost, freight or sale price must be filled in")]
    NoPricingData,

    #[error("sale price must not be zero")]
    ZeroSalePrice,

    #[error("quote has no id; save it before updating")]
    MissingId,
}

/// A quote as typed by the user, before it is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub details: QuoteDetails,
    pub pricing: CalculationState,
}

fn require_text(
    value: &str,
    field: &'static str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Returns the first problem found, checked in form order.
pub fn validate_quote(draft: &QuoteDraft) -> Result<(), ValidationError> {
    let details = &draft.details;
    let pricing = &draft.pricing;

    if details.date.is_none() {
        return Err(ValidationError::MissingField("date"));
    }
    require_text(&details.city, "city")?;
    require_text(&details.client, "client")?;
    require_text(&details.brand, "brand")?;
    require_text(&details.code, "code")?;
    if details.quantity <= Decimal::ZERO {
        return Err(ValidationError::InvalidQuantity);
    }
    require_text(&details.model, "model")?;

    if pricing.product_cost.is_zero() && pricing.freight.is_zero() && pricing.sale_price.is_zero() {
        return Err(ValidationError::NoPricingData);
    }
    if pricing.sale_price.is_zero() {
        return Err(ValidationError::ZeroSalePrice);
    }
    Ok(())
}

/// Business id for a quote saved without one.
pub fn generate_quote_id(now: DateTime<Utc>) -> String {
    format!("calc_{}", now.timestamp_millis())
}

/// Fills in the business id and free-form status when they are blank.
pub fn assign_identity(
    pricing: &mut CalculationState,
    now: DateTime<Utc>,
) {
    let workflow = &mut pricing.workflow;
    if workflow.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
        workflow.id = Some(generate_quote_id(now));
    }
    if workflow.status.as_deref().is_none_or(|s| s.trim().is_empty()) {
        workflow.status = Some(workflow.remote_status.as_str().to_string());
    }
}

/// An update must target a quote that already has a business id.
pub fn require_id(pricing: &CalculationState) -> Result<&str, ValidationError> {
    match pricing.workflow.id.as_deref() {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(ValidationError::MissingId),
    }
}
