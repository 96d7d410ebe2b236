use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CalculationState;

/// The solvable quantity the user edited last.
///
/// Exactly one driver is authoritative per recompute; the other four
/// solvable quantities are outputs of that call. "No driver" is spelled
/// `Option::<Driver>::None` at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Driver {
    DesiredProfitPct,
    SalePrice,
    NetProfit,
    AbsoluteProfit,
    MarkupPct,
}

impl Driver {
    pub const ALL: [Driver; 5] = [
        Self::DesiredProfitPct,
        Self::SalePrice,
        Self::NetProfit,
        Self::AbsoluteProfit,
        Self::MarkupPct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DesiredProfitPct => "desired_profit_pct",
            Self::SalePrice => "sale_price",
            Self::NetProfit => "net_profit",
            Self::AbsoluteProfit => "absolute_profit",
            Self::MarkupPct => "markup_pct",
        }
    }

    /// Parses a field name into a driver.
    ///
    /// Accepts the snake_case names, their kebab-case spelling, and the
    /// keys used by legacy stored records. Anything else is `None`, which
    /// the recompute orchestrator treats as "no driver".
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "desired_profit_pct" | "desired-profit-pct" | "lucroDesejado" => {
                Some(Self::DesiredProfitPct)
            }
            "sale_price" | "sale-price" | "precoVenda" => Some(Self::SalePrice),
            "net_profit" | "net-profit" | "lucroLiquido" => Some(Self::NetProfit),
            "absolute_profit" | "absolute-profit" | "lucroAbsoluto" => Some(Self::AbsoluteProfit),
            "markup_pct" | "markup-pct" | "markup" => Some(Self::MarkupPct),
            _ => None,
        }
    }

    /// Reads the field this driver stands for.
    pub fn value(
        &self,
        state: &CalculationState,
    ) -> Decimal {
        match self {
            Self::DesiredProfitPct => state.desired_profit_pct,
            Self::SalePrice => state.sale_price,
            Self::NetProfit => state.net_profit,
            Self::AbsoluteProfit => state.absolute_profit,
            Self::MarkupPct => state.markup_pct,
        }
    }

    /// Overwrites the field this driver stands for.
    pub fn assign(
        &self,
        state: &mut CalculationState,
        value: Decimal,
    ) {
        let slot = match self {
            Self::DesiredProfitPct => &mut state.desired_profit_pct,
            Self::SalePrice => &mut state.sale_price,
            Self::NetProfit => &mut state.net_profit,
            Self::AbsoluteProfit => &mut state.absolute_profit,
            Self::MarkupPct => &mut state.markup_pct,
        };
        *slot = value;
    }
}
