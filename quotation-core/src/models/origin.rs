use serde::{Deserialize, Serialize};

/// Where the product is sourced from. Only imported products pay DIFAL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    #[default]
    Domestic,
    Imported,
}

impl Origin {
    /// Code stored with persisted quotes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domestic => "Nacional",
            Self::Imported => "Importado",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Domestic => "Domestic",
            Self::Imported => "Imported",
        }
    }

    /// Accepts both the stored codes and the English labels, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "nacional" | "domestic" => Some(Self::Domestic),
            "importado" | "imported" => Some(Self::Imported),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_stored_codes() {
        assert_eq!(Origin::parse("Nacional"), Some(Origin::Domestic));
        assert_eq!(Origin::parse("Importado"), Some(Origin::Imported));
    }

    #[test]
    fn parse_accepts_labels_case_insensitively() {
        assert_eq!(Origin::parse(" IMPORTED "), Some(Origin::Imported));
        assert_eq!(Origin::parse("domestic"), Some(Origin::Domestic));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(Origin::parse("abroad"), None);
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for origin in [Origin::Domestic, Origin::Imported] {
            assert_eq!(Origin::parse(origin.as_str()), Some(origin));
        }
    }
}
