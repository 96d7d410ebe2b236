//! Pricing calculations for sales quotes.
//!
//! [`pricing`] holds the bidirectional recalculation engine; [`common`]
//! holds the rounding and guarded-division helpers it is built from.

pub mod common;
pub mod pricing;

pub use pricing::{CostBase, MarginSuggestions, recompute, resolve_cost_base, suggest_margins};
