pub mod auth;
pub mod calculations;
pub mod db;
pub mod listing;
pub mod models;
pub mod service;
pub mod session;
pub mod validation;

pub use auth::{AuthError, Identity, Role};
pub use db::{DbConfig, QuoteRepository, RepositoryError, RepositoryFactory, RepositoryRegistry};
pub use listing::{QuoteFilter, StatusTab, filter_quotes};
pub use models::*;
pub use service::{QuoteService, ServiceError};
pub use session::{BaseField, ParseDecimalError, PricingSession, coerce_numeric, parse_decimal};
pub use validation::{QuoteDraft, ValidationError, validate_quote};
