//! Bidirectional pricing recalculation.
//!
//! A quote has five mutually dependent quantities: desired profit %, sale
//! price, net profit, absolute profit and markup %. Whichever one the user
//! edited last (the [`Driver`]) is authoritative, and [`recompute`] solves
//! the rest of the state from it.
//!
//! # Formulas
//!
//! Percentages are whole numbers. `C`, `T` are the commission and tax
//! rates, `CB` is the cost base.
//!
//! | Driver | Sale price |
//! |--------|------------|
//! | desired profit % `D` | `CB / (1 - (C + T + D)/100)`, zeroed unless the denominator is in (0, 1] and `CB > 0` |
//! | sale price | as entered |
//! | net profit `N` | `(N + CB) / (1 - (C + T)/100)`, 0 if the denominator is 0 |
//! | absolute profit `A` | `A + CB` |
//! | markup % `M` | `M * CB / 100` |
//!
//! From the resulting sale price `P`:
//!
//! | Field | Formula |
//! |-------|---------|
//! | commission | `P * C/100` |
//! | tax | `P * T/100` |
//! | net profit | `P - cost - freight - bank slip - DIFAL - commission - tax` |
//! | absolute profit | `P - CB` |
//! | markup % | `P / CB * 100`, 0 if `CB` is 0 |
//! | desired profit % | `net profit / P * 100`, 0 if `P` is 0 |
//!
//! Every value written is rounded to two decimals where it is produced, and
//! later formulas consume the rounded figures. A sale price typed by the
//! user is used exactly as entered; the driver field itself is never
//! rewritten.
//!
//! Degenerate arithmetic never fails: guarded divisions substitute zero,
//! and a figure that leaves the `Decimal` range zeroes the price block the
//! same way an ill-posed desired-profit formula does.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use quotation_core::calculations::recompute;
//! use quotation_core::{CalculationState, Driver};
//!
//! let mut state = CalculationState::default();
//! state.product_cost = dec!(100);
//! state.freight = dec!(10);
//! state.desired_profit_pct = dec!(20);
//!
//! let state = recompute(Some(Driver::DesiredProfitPct), &state);
//!
//! assert_eq!(state.cost_base, dec!(114.50));
//! assert_eq!(state.sale_price, dec!(160.14));
//! assert_eq!(state.net_profit, dec!(32.02));
//! assert_eq!(state.markup_pct, dec!(139.86));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calculations::common::{fraction, percent_of, ratio_or_zero, round_half_up};
use crate::models::{CalculationState, Driver, Origin};

/// Profit targets of the two margin suggestions, in percent.
const SUGGESTED_MARGINS: (Decimal, Decimal) = (
    Decimal::from_parts(20, 0, 0, false, 0),
    Decimal::from_parts(30, 0, 0, false, 0),
);

/// DIFAL amount and the cost base it feeds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBase {
    pub difal_amount: Decimal,
    /// Product cost + freight + bank slip fee + DIFAL.
    pub cost_base: Decimal,
}

/// Net profit the quote would make at fixed 20% and 30% profit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginSuggestions {
    pub profit_at_20_pct: Decimal,
    pub profit_at_30_pct: Decimal,
}

/// Everything derived from a sale price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PriceBreakdown {
    sale_price: Decimal,
    commission_amount: Decimal,
    tax_amount: Decimal,
    net_profit: Decimal,
    absolute_profit: Decimal,
    markup_pct: Decimal,
}

impl PriceBreakdown {
    /// The all-zero block used when the desired-profit formula is not well-posed.
    fn zeroed() -> Self {
        Self {
            sale_price: Decimal::ZERO,
            commission_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            absolute_profit: Decimal::ZERO,
            markup_pct: Decimal::ZERO,
        }
    }

    /// Derives every field from `sale_price`, taken as given. Callers round
    /// prices they compute; a typed price is not rounded. `None` when a
    /// figure overflows.
    fn from_sale_price(
        state: &CalculationState,
        base: &CostBase,
        sale_price: Decimal,
    ) -> Option<Self> {
        let commission_amount = round_half_up(percent_of(sale_price, state.commission_pct)?);
        let tax_amount = round_half_up(percent_of(sale_price, state.tax_pct)?);
        let costs = [
            state.product_cost,
            state.freight,
            state.bank_slip_fee,
            base.difal_amount,
            commission_amount,
            tax_amount,
        ];
        let net_profit = round_half_up(
            costs
                .iter()
                .try_fold(sale_price, |rest, cost| rest.checked_sub(*cost))?,
        );
        let absolute_profit = round_half_up(sale_price.checked_sub(base.cost_base)?);
        let markup_pct = round_half_up(
            ratio_or_zero(sale_price, base.cost_base).checked_mul(Decimal::ONE_HUNDRED)?,
        );

        Some(Self {
            sale_price,
            commission_amount,
            tax_amount,
            net_profit,
            absolute_profit,
            markup_pct,
        })
    }

    /// Breakdown for `sale_price`, or the zero block when there is no
    /// price or a figure overflows.
    fn for_price(
        state: &CalculationState,
        base: &CostBase,
        sale_price: Option<Decimal>,
    ) -> Self {
        sale_price
            .and_then(|sale_price| Self::from_sale_price(state, base, sale_price))
            .unwrap_or_else(Self::zeroed)
    }

    /// Writes the breakdown and cost base into a copy of `state`.
    ///
    /// `keep` names the driver whose user-entered value must survive.
    fn apply(
        self,
        state: &CalculationState,
        base: &CostBase,
        keep: Driver,
    ) -> CalculationState {
        let mut next = state.clone();
        next.difal_amount = base.difal_amount;
        next.cost_base = base.cost_base;
        next.commission_amount = self.commission_amount;
        next.tax_amount = self.tax_amount;

        if keep != Driver::SalePrice {
            next.sale_price = self.sale_price;
        }
        if keep != Driver::NetProfit {
            next.net_profit = self.net_profit;
        }
        if keep != Driver::AbsoluteProfit {
            next.absolute_profit = self.absolute_profit;
        }
        if keep != Driver::MarkupPct {
            next.markup_pct = self.markup_pct;
        }
        next
    }
}

/// Computes the DIFAL amount and cost base from the base inputs.
///
/// DIFAL only applies to imported products. A zero product cost is not an
/// error; the cost base is then just freight plus the bank slip fee. Inputs
/// too large to add up resolve to a zero cost base.
pub fn resolve_cost_base(state: &CalculationState) -> CostBase {
    checked_cost_base(state).unwrap_or(CostBase {
        difal_amount: Decimal::ZERO,
        cost_base: Decimal::ZERO,
    })
}

fn checked_cost_base(state: &CalculationState) -> Option<CostBase> {
    let difal_amount = match state.origin {
        Origin::Imported => round_half_up(percent_of(state.product_cost, state.difal_pct)?),
        Origin::Domestic => Decimal::ZERO,
    };
    let cost_base = [state.freight, state.bank_slip_fee, difal_amount]
        .iter()
        .try_fold(state.product_cost, |sum, part| sum.checked_add(*part))?;

    Some(CostBase {
        difal_amount,
        cost_base,
    })
}

/// `1 - (C + T + extra)/100`, or `None` when the rates overflow.
fn margin_denominator(
    state: &CalculationState,
    extra_pct: Decimal,
) -> Option<Decimal> {
    let pct = state
        .commission_pct
        .checked_add(state.tax_pct)?
        .checked_add(extra_pct)?;
    Decimal::ONE.checked_sub(fraction(pct))
}

/// Sale price that yields `profit_pct` net margin, or `None` when the
/// formula is not well-posed.
///
/// The denominator `1 - (C + T + profit)/100` must lie in (0, 1] and the
/// cost base must be positive.
fn price_for_margin(
    state: &CalculationState,
    base: &CostBase,
    profit_pct: Decimal,
) -> Option<Decimal> {
    let denominator = margin_denominator(state, profit_pct)?;
    if denominator <= Decimal::ZERO
        || denominator > Decimal::ONE
        || base.cost_base <= Decimal::ZERO
    {
        return None;
    }
    base.cost_base.checked_div(denominator).map(round_half_up)
}

/// `net_profit / sale_price * 100`, or 0 for a zero sale price.
fn reverse_profit_pct(
    net_profit: Decimal,
    sale_price: Decimal,
) -> Decimal {
    ratio_or_zero(net_profit, sale_price)
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(round_half_up)
        .unwrap_or(Decimal::ZERO)
}

fn solve_for_desired_profit(state: &CalculationState) -> CalculationState {
    let base = resolve_cost_base(state);
    let sale_price = price_for_margin(state, &base, state.desired_profit_pct);
    let breakdown = PriceBreakdown::for_price(state, &base, sale_price);

    breakdown.apply(state, &base, Driver::DesiredProfitPct)
}

fn solve_for_sale_price(state: &CalculationState) -> CalculationState {
    let base = resolve_cost_base(state);
    let breakdown = PriceBreakdown::for_price(state, &base, Some(state.sale_price));

    let mut next = breakdown.apply(state, &base, Driver::SalePrice);
    next.desired_profit_pct = reverse_profit_pct(breakdown.net_profit, state.sale_price);
    next
}

fn solve_for_net_profit(state: &CalculationState) -> CalculationState {
    let base = resolve_cost_base(state);
    let sale_price = margin_denominator(state, Decimal::ZERO).and_then(|denominator| {
        let total = state.net_profit.checked_add(base.cost_base)?;
        Some(round_half_up(ratio_or_zero(total, denominator)))
    });
    let breakdown = PriceBreakdown::for_price(state, &base, sale_price);

    let mut next = breakdown.apply(state, &base, Driver::NetProfit);
    next.desired_profit_pct = reverse_profit_pct(state.net_profit, breakdown.sale_price);
    next
}

fn solve_for_absolute_profit(state: &CalculationState) -> CalculationState {
    let base = resolve_cost_base(state);
    let sale_price = state
        .absolute_profit
        .checked_add(base.cost_base)
        .map(round_half_up);
    let breakdown = PriceBreakdown::for_price(state, &base, sale_price);

    let mut next = breakdown.apply(state, &base, Driver::AbsoluteProfit);
    next.desired_profit_pct = reverse_profit_pct(breakdown.net_profit, breakdown.sale_price);
    next
}

fn solve_for_markup(state: &CalculationState) -> CalculationState {
    let base = resolve_cost_base(state);
    let sale_price = percent_of(state.markup_pct, base.cost_base).map(round_half_up);
    let breakdown = PriceBreakdown::for_price(state, &base, sale_price);

    let mut next = breakdown.apply(state, &base, Driver::MarkupPct);
    next.desired_profit_pct = reverse_profit_pct(breakdown.net_profit, breakdown.sale_price);
    next
}

/// Net profit at the 20% and 30% targets for the current cost base and rates.
///
/// Independent of any driver. A target whose formula is not well-posed
/// yields 0 for that suggestion only.
pub fn suggest_margins(state: &CalculationState) -> MarginSuggestions {
    let base = resolve_cost_base(state);
    let profit_at = |profit_pct: Decimal| {
        price_for_margin(state, &base, profit_pct)
            .and_then(|sale_price| PriceBreakdown::from_sale_price(state, &base, sale_price))
            .map_or(Decimal::ZERO, |breakdown| breakdown.net_profit)
    };

    MarginSuggestions {
        profit_at_20_pct: profit_at(SUGGESTED_MARGINS.0),
        profit_at_30_pct: profit_at(SUGGESTED_MARGINS.1),
    }
}

/// Solves the pricing state for `driver` and refreshes the suggestions.
///
/// `state` must already hold the user's new value in the driver's field.
/// With no driver the state passes through unchanged apart from the
/// suggestion fields. Workflow fields are never touched.
pub fn recompute(
    driver: Option<Driver>,
    state: &CalculationState,
) -> CalculationState {
    trace!(driver = driver.map(|d| d.as_str()), "recomputing pricing state");

    let mut next = match driver {
        Some(Driver::DesiredProfitPct) => solve_for_desired_profit(state),
        Some(Driver::SalePrice) => solve_for_sale_price(state),
        Some(Driver::NetProfit) => solve_for_net_profit(state),
        Some(Driver::AbsoluteProfit) => solve_for_absolute_profit(state),
        Some(Driver::MarkupPct) => solve_for_markup(state),
        None => state.clone(),
    };

    let suggestions = suggest_margins(&next);
    next.profit_at_20_pct = suggestions.profit_at_20_pct;
    next.profit_at_30_pct = suggestions.profit_at_30_pct;
    next
}
