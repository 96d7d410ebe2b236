//! Status tabs and free-text search over saved quotes.

use serde::{Deserialize, Serialize};

use crate::models::{Quote, QuoteStatus};

/// Tabs of the quote list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusTab {
    #[default]
    All,
    Awaiting,
    Returned,
    /// Finalized quotes.
    Closed,
}

impl StatusTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Awaiting => "awaiting",
            Self::Returned => "returned",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todos" => Some(Self::All),
            "awaiting" | "aguardando" => Some(Self::Awaiting),
            "returned" | "retornado" => Some(Self::Returned),
            "closed" | "finalizado" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Remote status shown under this tab, or `None` for every status.
    pub fn status(&self) -> Option<QuoteStatus> {
        match self {
            Self::All => None,
            Self::Awaiting => Some(QuoteStatus::Awaiting),
            Self::Returned => Some(QuoteStatus::Returned),
            Self::Closed => Some(QuoteStatus::Finalized),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteFilter {
    pub tab: StatusTab,
    /// Case-insensitive substring; blank matches everything.
    pub search: String,
}

impl QuoteFilter {
    pub fn matches(
        &self,
        quote: &Quote,
    ) -> bool {
        if self
            .tab
            .status()
            .is_some_and(|status| quote.pricing.workflow.remote_status != status)
        {
            return false;
        }

        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        let details = &quote.details;
        [
            details.client.as_str(),
            details.city.as_str(),
            details.brand.as_str(),
            details.code.as_str(),
            quote.pricing.origin.as_str(),
            details.kind.as_str(),
            details.model.as_str(),
            quote.pricing.workflow.id.as_deref().unwrap_or_default(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Quotes visible under `filter`, in their original order.
pub fn filter_quotes<'a>(
    quotes: &'a [Quote],
    filter: &QuoteFilter,
) -> Vec<&'a Quote> {
    quotes.iter().filter(|quote| filter.matches(quote)).collect()
}
