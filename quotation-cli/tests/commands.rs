//! End-to-end command runs against an in-memory SQLite store.

use clap::Parser;
use pretty_assertions::assert_eq;
use quotation_cli::app::{dispatch, open_service};
use quotation_cli::cli::{Cli, Command};
use quotation_cli::config::AppConfig;
use quotation_core::{DbConfig, QuoteService, QuoteStatus, StatusTab};
use rust_decimal_macros::dec;

fn config(role: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.identity.user_id = "u-1".to_string();
    config.identity.role = role.to_string();
    config.identity.company = "acme".to_string();
    config
}

async fn service(config: &AppConfig) -> QuoteService {
    let db = DbConfig {
        backend: "sqlite".to_string(),
        connection_string: ":memory:".to_string(),
    };
    open_service(&db, config).await.unwrap()
}

fn command(args: &[&str]) -> Command {
    Cli::try_parse_from(std::iter::once("quotation").chain(args.iter().copied()))
        .unwrap()
        .command
}

async fn run(
    service: &QuoteService,
    config: &AppConfig,
    args: &[&str],
) -> anyhow::Result<String> {
    let mut out = Vec::new();
    dispatch(&command(args), service, config, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

const SAVE_ACME: &[&str] = &[
    "save",
    "--date",
    "2024-06-10",
    "--city",
    "Campinas",
    "--client",
    "ACME",
    "--brand",
    "Bosch",
    "--code",
    "B-100",
    "--kind",
    "Pump",
    "--quantity",
    "2",
    "--model",
    "X1",
    "--set",
    "product_cost=100",
    "--set",
    "freight=10",
    "--set",
    "desired_profit_pct=20",
];

// =============================================================================
// save / show / list
// =============================================================================

#[tokio::test]
async fn save_then_show_round_trips_pricing() {
    let config = config("funcionario");
    let service = service(&config).await;

    let saved = run(&service, &config, SAVE_ACME).await.unwrap();
    assert!(saved.starts_with("Saved quote #1 (calc_"));

    let shown = run(&service, &config, &["show", "1"]).await.unwrap();
    assert!(shown.contains("Client: ACME (Campinas)"));
    assert!(shown.contains("Status: aguardando"));
    assert!(shown.contains("Created by: u-1"));
    assert!(shown.contains("160.14"));

    let quote = service.get(1).await.unwrap();
    assert_eq!(quote.pricing.sale_price, dec!(160.14));
    assert_eq!(quote.pricing.net_profit, dec!(32.02));
    assert_eq!(quote.pricing.profit_at_30_pct, dec!(55.85));
}

#[tokio::test]
async fn save_rejects_missing_details() {
    let config = config("funcionario");
    let service = service(&config).await;

    let err = run(
        &service,
        &config,
        &["save", "--set", "product_cost=100", "--set", "desired_profit_pct=20"],
    )
    .await
    .unwrap_err();

    assert!(format!("{err:#}").contains("date is required"));
}

#[tokio::test]
async fn list_filters_by_search() {
    let config = config("funcionario");
    let service = service(&config).await;
    run(&service, &config, SAVE_ACME).await.unwrap();

    let hit = run(&service, &config, &["list", "--search", "bosch"]).await.unwrap();
    let miss = run(&service, &config, &["list", "--search", "makita"]).await.unwrap();

    assert!(hit.contains("ACME"));
    assert!(hit.contains("aguardando"));
    assert_eq!(miss, "No quotes found.\n");
}

// =============================================================================
// update / status / delete
// =============================================================================

#[tokio::test]
async fn update_keeps_stored_figures_and_resets_status() {
    let config = config("admin");
    let service = service(&config).await;
    run(&service, &config, SAVE_ACME).await.unwrap();
    run(&service, &config, &["set-status", "1", "retornado"]).await.unwrap();

    let out = run(
        &service,
        &config,
        &["update", "1", "--set", "sale_price=200", "--notes", "revised"],
    )
    .await
    .unwrap();

    assert!(out.contains("status reset to aguardando"));
    let quote = service.get(1).await.unwrap();
    assert_eq!(quote.pricing.sale_price, dec!(200));
    assert_eq!(quote.pricing.desired_profit_pct, dec!(34.25));
    assert_eq!(quote.pricing.workflow.remote_status, QuoteStatus::Awaiting);
    assert_eq!(quote.pricing.workflow.notes.as_deref(), Some("revised"));
}

#[tokio::test]
async fn employee_cannot_close_or_delete() {
    let config = config("funcionario");
    let service = service(&config).await;
    run(&service, &config, SAVE_ACME).await.unwrap();

    let status = run(&service, &config, &["set-status", "1", "finalizado"]).await;
    let delete = run(&service, &config, &["delete", "1"]).await;

    assert!(format!("{:#}", status.unwrap_err()).contains("permission denied"));
    assert!(format!("{:#}", delete.unwrap_err()).contains("permission denied"));
    assert!(service.get(1).await.is_ok());
}

#[tokio::test]
async fn admin_closes_and_deletes() {
    let config = config("admin");
    let service = service(&config).await;
    run(&service, &config, SAVE_ACME).await.unwrap();

    run(&service, &config, &["set-status", "1", "finalizado"]).await.unwrap();
    let closed = service
        .list(&quotation_core::QuoteFilter {
            tab: StatusTab::Closed,
            search: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(closed.len(), 1);

    let out = run(&service, &config, &["delete", "1"]).await.unwrap();
    assert_eq!(out, "Deleted quote #1\n");
    assert!(service.get(1).await.is_err());
}

// =============================================================================
// export
// =============================================================================

#[tokio::test]
async fn export_writes_csv_to_stdout() {
    let config = config("funcionario");
    let service = service(&config).await;
    run(&service, &config, SAVE_ACME).await.unwrap();

    let out = run(&service, &config, &["export"]).await.unwrap();

    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("id,business_id,date,client"));
    assert!(lines[1].contains(",ACME,Campinas,Bosch,B-100,Pump,X1,2,Nacional,"));
    assert!(lines[1].contains(",160.14,32.02,20.00,"));
}
