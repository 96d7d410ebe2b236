use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CalculationState;

/// Commercial details typed by the employee for one quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDetails {
    pub date: Option<NaiveDate>,
    pub city: String,
    pub client: String,
    pub brand: String,
    pub code: String,
    /// Product type.
    pub kind: String,
    pub quantity: Decimal,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    /// Tenant namespace the quote belongs to.
    pub company: String,

    pub details: QuoteDetails,
    pub pricing: CalculationState,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// For creating new quotes (no id or timestamps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuote {
    pub company: String,
    pub details: QuoteDetails,
    pub pricing: CalculationState,
}
