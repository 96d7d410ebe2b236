use serde::{Deserialize, Serialize};

/// Workflow status of a quote as tracked by the back office.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteStatus {
    /// Submitted by an employee, waiting for pricing review.
    #[default]
    Awaiting,
    Returned,
    ProfitCalculated,
    Sent,
    Finalized,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 5] = [
        Self::Awaiting,
        Self::Returned,
        Self::ProfitCalculated,
        Self::Sent,
        Self::Finalized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Awaiting => "aguardando",
            Self::Returned => "retornado",
            Self::ProfitCalculated => "lucro calculado",
            Self::Sent => "enviado",
            Self::Finalized => "finalizado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "aguardando" | "awaiting" => Some(Self::Awaiting),
            "retornado" | "returned" => Some(Self::Returned),
            "lucro calculado" | "profit-calculated" => Some(Self::ProfitCalculated),
            "enviado" | "sent" => Some(Self::Sent),
            "finalizado" | "finalized" => Some(Self::Finalized),
            _ => None,
        }
    }
}
