//! Command implementations. Output goes to the given writer so tests can
//! capture it.

use std::io::Write;

use anyhow::{Context, Result};
use quotation_core::{
    CalculationState, PricingDefaults, PricingSession, Quote, QuoteDetails, QuoteDraft,
    QuoteFilter, QuoteService, QuoteStatus,
};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::cli::{DetailsArgs, EditTarget, ListArgs, PricingArgs, WorkflowArgs};
use crate::export::write_csv;

/// Applies the origin, then each edit in order.
pub fn apply_pricing(
    session: &mut PricingSession,
    args: &PricingArgs,
) {
    if let Some(origin) = args.origin {
        session.set_origin(origin);
    }
    for edit in &args.edits {
        match edit.target {
            EditTarget::Solvable(driver) => session.edit_solvable(driver, &edit.text),
            EditTarget::Base(field) => session.edit_base(field, &edit.text),
        };
    }
}

fn line(
    out: &mut dyn Write,
    label: &str,
    value: Decimal,
) -> std::io::Result<()> {
    writeln!(out, "  {label:<22}{value:>12.2}")
}

pub fn write_state(
    out: &mut dyn Write,
    state: &CalculationState,
) -> Result<()> {
    writeln!(out, "Origin: {}", state.origin.label())?;
    writeln!(out, "Costs")?;
    line(out, "Product cost", state.product_cost)?;
    line(out, "Freight", state.freight)?;
    line(out, "Bank slip fee", state.bank_slip_fee)?;
    line(out, "DIFAL", state.difal_amount)?;
    line(out, "Cost base", state.cost_base)?;
    writeln!(out, "Rates (%)")?;
    line(out, "Commission", state.commission_pct)?;
    line(out, "Tax", state.tax_pct)?;
    line(out, "DIFAL", state.difal_pct)?;
    writeln!(out, "Pricing")?;
    line(out, "Sale price", state.sale_price)?;
    line(out, "Commission", state.commission_amount)?;
    line(out, "Tax", state.tax_amount)?;
    line(out, "Net profit", state.net_profit)?;
    line(out, "Absolute profit", state.absolute_profit)?;
    line(out, "Desired profit %", state.desired_profit_pct)?;
    line(out, "Markup %", state.markup_pct)?;
    writeln!(out, "Suggestions")?;
    line(out, "Profit at 20%", state.profit_at_20_pct)?;
    line(out, "Profit at 30%", state.profit_at_30_pct)?;

    if state.has_loss() {
        warn!(
            net_profit = %state.net_profit,
            sale_price = %state.sale_price,
            "quote runs at a loss"
        );
        writeln!(out, "WARNING: this quote runs at a loss")?;
    }
    Ok(())
}

pub fn write_quote(
    out: &mut dyn Write,
    quote: &Quote,
) -> Result<()> {
    let details = &quote.details;
    let workflow = &quote.pricing.workflow;

    writeln!(
        out,
        "Quote #{} ({})",
        quote.id,
        workflow.id.as_deref().unwrap_or("no id")
    )?;
    writeln!(out, "Status: {}", workflow.remote_status.as_str())?;
    if let Some(note) = &workflow.status {
        writeln!(out, "Status note: {note}")?;
    }
    writeln!(
        out,
        "Date: {}",
        details.date.map(|d| d.to_string()).unwrap_or_default()
    )?;
    writeln!(out, "Client: {} ({})", details.client, details.city)?;
    writeln!(
        out,
        "Product: {} {} {} [{}] x{}",
        details.brand,
        details.model,
        details.kind,
        details.code,
        details.quantity.normalize()
    )?;
    if let Some(responsible) = &workflow.responsible {
        writeln!(out, "Responsible: {responsible}")?;
    }
    if let Some(created_by) = &workflow.created_by {
        writeln!(out, "Created by: {created_by}")?;
    }
    if let Some(notes) = &workflow.notes {
        writeln!(out, "Notes: {notes}")?;
    }
    write_state(out, &quote.pricing)
}

pub fn write_list(
    out: &mut dyn Write,
    quotes: &[Quote],
) -> Result<()> {
    if quotes.is_empty() {
        writeln!(out, "No quotes found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>5}  {:<18} {:<20} {:<14} {:>12} {:>12}  {}",
        "#", "ID", "Client", "Code", "Sale price", "Net profit", "Status"
    )?;
    for quote in quotes {
        writeln!(
            out,
            "{:>5}  {:<18} {:<20} {:<14} {:>12.2} {:>12.2}  {}",
            quote.id,
            quote.pricing.workflow.id.as_deref().unwrap_or("-"),
            quote.details.client,
            quote.details.code,
            quote.pricing.sale_price,
            quote.pricing.net_profit,
            quote.pricing.workflow.remote_status.as_str()
        )?;
    }
    Ok(())
}

fn filter(args: &ListArgs) -> QuoteFilter {
    QuoteFilter {
        tab: args.tab,
        search: args.search.clone(),
    }
}

pub fn calc(
    defaults: PricingDefaults,
    pricing: &PricingArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let mut session = PricingSession::new(defaults);
    apply_pricing(&mut session, pricing);
    write_state(out, session.state())
}

pub async fn save(
    service: &QuoteService,
    defaults: PricingDefaults,
    details: &DetailsArgs,
    pricing: &PricingArgs,
    workflow: &WorkflowArgs,
    out: &mut dyn Write,
) -> Result<Quote> {
    let mut session = PricingSession::new(defaults);
    apply_pricing(&mut session, pricing);

    let mut draft = QuoteDraft {
        details: QuoteDetails::default(),
        pricing: session.into_state(),
    };
    details.apply(&mut draft.details);
    workflow.apply(&mut draft.pricing.workflow);

    let quote = service.save(draft).await.context("Failed to save quote")?;
    info!(id = quote.id, "saved");
    writeln!(
        out,
        "Saved quote #{} ({})",
        quote.id,
        quote.pricing.workflow.id.as_deref().unwrap_or_default()
    )?;
    write_state(out, &quote.pricing)?;
    Ok(quote)
}

pub async fn update(
    service: &QuoteService,
    id: i64,
    details: &DetailsArgs,
    pricing: &PricingArgs,
    workflow: &WorkflowArgs,
    out: &mut dyn Write,
) -> Result<Quote> {
    let mut quote = service
        .get(id)
        .await
        .with_context(|| format!("Failed to load quote #{id}"))?;

    let mut session = PricingSession::default();
    session.load(quote.pricing.clone());
    apply_pricing(&mut session, pricing);
    quote.pricing = session.into_state();
    details.apply(&mut quote.details);
    workflow.apply(&mut quote.pricing.workflow);

    let quote = service
        .update(quote)
        .await
        .with_context(|| format!("Failed to update quote #{id}"))?;
    writeln!(
        out,
        "Updated quote #{}; status reset to {}",
        quote.id,
        quote.pricing.workflow.remote_status.as_str()
    )?;
    write_state(out, &quote.pricing)?;
    Ok(quote)
}

pub async fn list(
    service: &QuoteService,
    args: &ListArgs,
    out: &mut dyn Write,
) -> Result<Vec<Quote>> {
    let quotes = service
        .list(&filter(args))
        .await
        .context("Failed to list quotes")?;
    write_list(out, &quotes)?;
    Ok(quotes)
}

pub async fn show(
    service: &QuoteService,
    id: i64,
    out: &mut dyn Write,
) -> Result<Quote> {
    let quote = service
        .get(id)
        .await
        .with_context(|| format!("Failed to load quote #{id}"))?;
    write_quote(out, &quote)?;
    Ok(quote)
}

pub async fn set_status(
    service: &QuoteService,
    id: i64,
    status: QuoteStatus,
    out: &mut dyn Write,
) -> Result<()> {
    service
        .set_status(id, status)
        .await
        .with_context(|| format!("Failed to change status of quote #{id}"))?;
    writeln!(out, "Quote #{id} is now {}", status.as_str())?;
    Ok(())
}

pub async fn delete(
    service: &QuoteService,
    id: i64,
    out: &mut dyn Write,
) -> Result<()> {
    service
        .delete(id)
        .await
        .with_context(|| format!("Failed to delete quote #{id}"))?;
    writeln!(out, "Deleted quote #{id}")?;
    Ok(())
}

/// Writes CSV to `out` and returns the row count.
pub async fn export(
    service: &QuoteService,
    args: &ListArgs,
    out: &mut dyn Write,
) -> Result<usize> {
    let quotes = service
        .list(&filter(args))
        .await
        .context("Failed to list quotes")?;
    let rows = write_csv(out, &quotes).context("Failed to write CSV")?;
    info!(rows, "exported quotes");
    Ok(rows)
}
