//! `quotation.toml` loading.
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "quotes.db"
//!
//! [pricing]
//! bank_slip_fee = 4.50
//! commission_pct = 4.5
//! tax_pct = 4
//! difal_pct = 13
//!
//! [identity]
//! user_id = "u-1"
//! email = "ana@example.com"
//! role = "admin"
//! company = "acme"
//! ```
//!
//! Every section and key is optional.

use std::path::{Path, PathBuf};

use quotation_core::{DbConfig, Identity, PricingDefaults, Role};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "quotation.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub user_id: String,
    pub email: String,
    pub role: String,
    pub company: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            email: String::new(),
            role: Role::Employee.as_str().to_string(),
            company: "default".to_string(),
        }
    }
}

impl IdentityConfig {
    pub fn to_identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            role: Role::parse(&self.role),
            company: self.company.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DbConfig,
    pub pricing: PricingDefaults,
    pub identity: IdentityConfig,
}

impl AppConfig {
    pub fn from_toml_str(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads `path`, or `quotation.toml` in the working directory. A missing
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        debug!(path = %path.display(), "loaded config file");
        Self::from_toml_str(&text, path)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn parse(text: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::from_toml_str(text, Path::new("test.toml"))
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database.backend, "sqlite");
        assert_eq!(config.pricing.commission_pct, dec!(4.5));
    }

    #[test]
    fn full_file_is_read() {
        let config = parse(
            r#"
            [database]
            backend = "sqlite"
            connection_string = ":memory:"

            [pricing]
            bank_slip_fee = "3.20"
            commission_pct = 5
            tax_pct = 6.5
            difal_pct = 12

            [identity]
            user_id = "u-9"
            email = "bia@example.com"
            role = "admin"
            company = "globex"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.connection_string, ":memory:");
        assert_eq!(config.pricing.bank_slip_fee, dec!(3.20));
        assert_eq!(config.pricing.commission_pct, dec!(5));
        assert_eq!(config.pricing.tax_pct, dec!(6.5));
        assert_eq!(config.pricing.difal_pct, dec!(12));

        let identity = config.identity.to_identity();
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.company, "globex");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse(
            r#"
            [pricing]
            tax_pct = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.tax_pct, dec!(7));
        assert_eq!(config.pricing.difal_pct, dec!(13));
        assert_eq!(config.identity.to_identity().role, Role::Employee);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let err = parse("[database\nbackend = 1").unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("test.toml"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("quotation-config-does-not-exist.toml");

        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config, AppConfig::default());
    }
}
