//! Editing session for one quote.
//!
//! The engine itself is stateless; the session is the one-slot memory of
//! which solvable field the user touched last. Base-input edits recompute
//! against that remembered driver so, for example, changing freight while
//! the sale price is pinned keeps the sale price and moves the profit.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calculations::recompute;
use crate::models::{CalculationState, Driver, Origin, PricingDefaults};

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)").expect("numeric prefix pattern is valid")
});

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Leniently turns typed text into a number.
///
/// Takes the longest leading numeric prefix, so `"12abc"` is 12. Text with
/// no numeric prefix (`"abc"`, `""`, `"-"`) is 0. Never fails.
///
/// ```
/// use rust_decimal_macros::dec;
/// use quotation_core::session::coerce_numeric;
///
/// assert_eq!(coerce_numeric(" 12.5kg"), dec!(12.5));
/// assert_eq!(coerce_numeric("abc"), dec!(0));
/// ```
pub fn coerce_numeric(text: &str) -> Decimal {
    let Some(prefix) = NUMERIC_PREFIX.find(text.trim()) else {
        return Decimal::ZERO;
    };
    let prefix = prefix.as_str().trim_end_matches('.');
    let (negative, digits) = match prefix.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, prefix.trim_start_matches('+')),
    };

    let value = format!("0{digits}").parse::<Decimal>().unwrap_or(Decimal::ZERO);
    if negative { -value } else { value }
}

/// Editable inputs that are not solvable quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseField {
    ProductCost,
    Freight,
    BankSlipFee,
    CommissionPct,
    TaxPct,
    DifalPct,
}

impl BaseField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductCost => "product_cost",
            Self::Freight => "freight",
            Self::BankSlipFee => "bank_slip_fee",
            Self::CommissionPct => "commission_pct",
            Self::TaxPct => "tax_pct",
            Self::DifalPct => "difal_pct",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "product_cost" | "product-cost" => Some(Self::ProductCost),
            "freight" => Some(Self::Freight),
            "bank_slip_fee" | "bank-slip-fee" => Some(Self::BankSlipFee),
            "commission_pct" | "commission-pct" => Some(Self::CommissionPct),
            "tax_pct" | "tax-pct" => Some(Self::TaxPct),
            "difal_pct" | "difal-pct" => Some(Self::DifalPct),
            _ => None,
        }
    }

    fn assign(
        &self,
        state: &mut CalculationState,
        value: Decimal,
    ) {
        let slot = match self {
            Self::ProductCost => &mut state.product_cost,
            Self::Freight => &mut state.freight,
            Self::BankSlipFee => &mut state.bank_slip_fee,
            Self::CommissionPct => &mut state.commission_pct,
            Self::TaxPct => &mut state.tax_pct,
            Self::DifalPct => &mut state.difal_pct,
        };
        *slot = value;
    }
}

/// A quote being edited, plus the sticky driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingSession {
    state: CalculationState,
    last_driver: Option<Driver>,
}

impl PricingSession {
    /// Starts a blank quote with the given fixed rates.
    pub fn new(defaults: PricingDefaults) -> Self {
        Self {
            state: CalculationState::with_defaults(defaults),
            last_driver: None,
        }
    }

    pub fn state(&self) -> &CalculationState {
        &self.state
    }

    pub fn last_driver(&self) -> Option<Driver> {
        self.last_driver
    }

    /// Driver used for base-input edits. Desired profit % until the user
    /// edits a solvable field.
    pub fn effective_driver(&self) -> Driver {
        self.last_driver.unwrap_or(Driver::DesiredProfitPct)
    }

    /// Writes a solvable field and makes it the sticky driver.
    pub fn edit_solvable(
        &mut self,
        driver: Driver,
        text: &str,
    ) -> &CalculationState {
        let value = coerce_numeric(text);
        debug!(driver = driver.as_str(), %value, "solvable field edited");

        driver.assign(&mut self.state, value);
        self.last_driver = Some(driver);
        self.state = recompute(Some(driver), &self.state);
        &self.state
    }

    /// Writes a base input and recomputes against the sticky driver.
    pub fn edit_base(
        &mut self,
        field: BaseField,
        text: &str,
    ) -> &CalculationState {
        let value = coerce_numeric(text);
        debug!(field = field.as_str(), %value, "base field edited");

        field.assign(&mut self.state, value);
        self.state = recompute(Some(self.effective_driver()), &self.state);
        &self.state
    }

    pub fn set_origin(
        &mut self,
        origin: Origin,
    ) -> &CalculationState {
        self.state.origin = origin;
        self.state = recompute(Some(self.effective_driver()), &self.state);
        &self.state
    }

    /// Replaces the state with a saved record. The stored figures are
    /// shown as-is; only the suggestions are refreshed.
    pub fn load(
        &mut self,
        state: CalculationState,
    ) {
        self.last_driver = None;
        self.state = recompute(None, &state);
    }

    pub fn into_state(self) -> CalculationState {
        self.state
    }
}
