use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Origin, QuoteStatus};

/// Identity and workflow fields carried alongside the pricing figures.
///
/// The pricing engine never reads or writes these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteWorkflow {
    /// Business identifier shown to users (e.g. `calc_1718000000000`).
    pub id: Option<String>,
    /// Key of the stored record, once persisted.
    pub remote_id: Option<i64>,
    /// Free-form status typed by the employee.
    pub status: Option<String>,
    pub remote_status: QuoteStatus,
    pub responsible: Option<String>,
    pub created_by: Option<String>,
    pub notes: Option<String>,
}

/// Fixed rates used when a fresh quote is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingDefaults {
    /// Fixed bank slip fee, in currency.
    pub bank_slip_fee: Decimal,
    pub commission_pct: Decimal,
    pub tax_pct: Decimal,
    pub difal_pct: Decimal,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            bank_slip_fee: Decimal::new(450, 2),
            commission_pct: Decimal::new(45, 1),
            tax_pct: Decimal::new(4, 0),
            difal_pct: Decimal::new(13, 0),
        }
    }
}

/// Complete pricing state of one quote.
///
/// Percentages are whole numbers (`4.5` means 4.5%). The state only
/// changes through [`crate::calculations::recompute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationState {
    // Base inputs
    pub product_cost: Decimal,
    pub freight: Decimal,
    pub origin: Origin,

    // Fixed-rate inputs
    pub bank_slip_fee: Decimal,
    pub commission_pct: Decimal,
    pub tax_pct: Decimal,
    pub difal_pct: Decimal,

    // Solvable quantities, one of which drives each recompute
    pub desired_profit_pct: Decimal,
    pub sale_price: Decimal,
    pub net_profit: Decimal,
    pub absolute_profit: Decimal,
    /// Sale price as a percentage of cost base; 100 is break-even.
    pub markup_pct: Decimal,

    // Derived
    pub difal_amount: Decimal,
    pub commission_amount: Decimal,
    pub tax_amount: Decimal,
    pub cost_base: Decimal,

    // Suggestions
    pub profit_at_20_pct: Decimal,
    pub profit_at_30_pct: Decimal,

    pub workflow: QuoteWorkflow,
}

impl CalculationState {
    /// Creates a blank state using the given fixed rates.
    pub fn with_defaults(defaults: PricingDefaults) -> Self {
        Self {
            product_cost: Decimal::ZERO,
            freight: Decimal::ZERO,
            origin: Origin::Domestic,
            bank_slip_fee: defaults.bank_slip_fee,
            commission_pct: defaults.commission_pct,
            tax_pct: defaults.tax_pct,
            difal_pct: defaults.difal_pct,
            desired_profit_pct: Decimal::ZERO,
            sale_price: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            absolute_profit: Decimal::ZERO,
            markup_pct: Decimal::ZERO,
            difal_amount: Decimal::ZERO,
            commission_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            cost_base: Decimal::ZERO,
            profit_at_20_pct: Decimal::ZERO,
            profit_at_30_pct: Decimal::ZERO,
            workflow: QuoteWorkflow::default(),
        }
    }

    /// True when the computed profit or price is negative, which the
    /// caller should surface as a warning.
    pub fn has_loss(&self) -> bool {
        self.net_profit < Decimal::ZERO || self.sale_price < Decimal::ZERO
    }
}

impl Default for CalculationState {
    fn default() -> Self {
        Self::with_defaults(PricingDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_uses_domain_rates() {
        let state = CalculationState::default();

        assert_eq!(state.bank_slip_fee, dec!(4.50));
        assert_eq!(state.commission_pct, dec!(4.5));
        assert_eq!(state.tax_pct, dec!(4));
        assert_eq!(state.difal_pct, dec!(13));
        assert_eq!(state.origin, Origin::Domestic);
    }

    #[test]
    fn default_has_all_computed_fields_zero() {
        let state = CalculationState::default();

        for value in [
            state.desired_profit_pct,
            state.sale_price,
            state.net_profit,
            state.absolute_profit,
            state.markup_pct,
            state.difal_amount,
            state.commission_amount,
            state.tax_amount,
            state.cost_base,
            state.profit_at_20_pct,
            state.profit_at_30_pct,
        ] {
            assert_eq!(value, dec!(0));
        }
        assert_eq!(state.workflow.remote_status, QuoteStatus::Awaiting);
    }

    #[test]
    fn with_defaults_applies_overrides() {
        let defaults = PricingDefaults {
            bank_slip_fee: dec!(3.20),
            commission_pct: dec!(5),
            tax_pct: dec!(6.5),
            difal_pct: dec!(12),
        };

        let state = CalculationState::with_defaults(defaults);

        assert_eq!(state.bank_slip_fee, dec!(3.20));
        assert_eq!(state.tax_pct, dec!(6.5));
    }

    #[test]
    fn has_loss_flags_negative_profit() {
        let mut state = CalculationState::default();
        assert!(!state.has_loss());

        state.net_profit = dec!(-23.00);
        assert!(state.has_loss());
    }
}
