use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use quotation_core::{DbConfig, QuoteService, RepositoryRegistry};
use quotation_db_sqlite::SqliteRepositoryFactory;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::commands;
use crate::config::AppConfig;

/// Registry with every backend this binary ships.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Command-line `--backend`/`--db` win over the config file.
pub fn db_config(
    cli: &Cli,
    config: &AppConfig,
) -> DbConfig {
    DbConfig {
        backend: cli
            .backend
            .clone()
            .unwrap_or_else(|| config.database.backend.clone()),
        connection_string: cli
            .db
            .clone()
            .unwrap_or_else(|| config.database.connection_string.clone()),
    }
}

pub async fn open_service(
    db: &DbConfig,
    config: &AppConfig,
) -> Result<QuoteService> {
    debug!(backend = %db.backend, "connecting");
    let repository = build_registry()
        .create(db)
        .await
        .with_context(|| format!("Failed to open '{}' database", db.backend))?;
    Ok(QuoteService::new(repository, config.identity.to_identity()))
}

/// Runs one parsed command. `calc` never touches the database.
pub async fn run(
    cli: Cli,
    config: AppConfig,
    out: &mut dyn Write,
) -> Result<()> {
    if let Command::Calc(pricing) = &cli.command {
        return commands::calc(config.pricing, pricing, out);
    }

    let service = open_service(&db_config(&cli, &config), &config).await?;
    dispatch(&cli.command, &service, &config, out).await
}

/// Runs a command against an already opened service.
pub async fn dispatch(
    command: &Command,
    service: &QuoteService,
    config: &AppConfig,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Calc(pricing) => commands::calc(config.pricing, pricing, out)?,
        Command::Save {
            details,
            pricing,
            workflow,
        } => {
            commands::save(service, config.pricing, details, pricing, workflow, out).await?;
        }
        Command::Update {
            id,
            details,
            pricing,
            workflow,
        } => {
            commands::update(service, *id, details, pricing, workflow, out).await?;
        }
        Command::List(list) => {
            commands::list(service, list, out).await?;
        }
        Command::Show { id } => {
            commands::show(service, *id, out).await?;
        }
        Command::SetStatus { id, status } => {
            commands::set_status(service, *id, *status, out).await?
        }
        Command::Delete { id } => commands::delete(service, *id, out).await?,
        Command::Export { list, output } => match output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create '{}'", path.display()))?;
                let mut writer = BufWriter::new(file);
                let rows = commands::export(service, list, &mut writer).await?;
                writer.flush()?;
                writeln!(out, "Exported {rows} quotes to {}", path.display())?;
            }
            None => {
                commands::export(service, list, out).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn registry_offers_sqlite() {
        assert_eq!(build_registry().available_backends(), vec!["sqlite"]);
    }

    #[test]
    fn flags_override_config_database() {
        let config = AppConfig::default();
        let cli = Cli::try_parse_from(["quotation", "list", "--db", ":memory:"]).unwrap();

        let db = db_config(&cli, &config);

        assert_eq!(db.backend, "sqlite");
        assert_eq!(db.connection_string, ":memory:");
    }

    #[test]
    fn config_database_used_without_flags() {
        let mut config = AppConfig::default();
        config.database.connection_string = "other.db".to_string();
        let cli = Cli::try_parse_from(["quotation", "list"]).unwrap();

        assert_eq!(db_config(&cli, &config).connection_string, "other.db");
    }

    #[tokio::test]
    async fn calc_runs_without_a_database() {
        let cli = Cli::try_parse_from([
            "quotation",
            "calc",
            "--backend",
            "postgres",
            "--set",
            "product_cost=100",
        ])
        .unwrap();
        let mut out = Vec::new();

        run(cli, AppConfig::default(), &mut out).await.unwrap();

        assert!(String::from_utf8(out).unwrap().contains("Cost base"));
    }

    #[tokio::test]
    async fn unknown_backend_is_reported() {
        let cli = Cli::try_parse_from(["quotation", "list", "--backend", "postgres"]).unwrap();
        let mut out = Vec::new();

        let err = run(cli, AppConfig::default(), &mut out).await.unwrap_err();

        assert!(format!("{err:#}").contains("unknown backend 'postgres'"));
    }
}
