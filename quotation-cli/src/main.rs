use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use quotation_cli::app;
use quotation_cli::cli::Cli;
use quotation_cli::config::AppConfig;
use quotation_cli::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(company = %config.identity.company, "configuration loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    app::run(cli, config, &mut out).await?;
    out.flush()?;

    Ok(())
}
