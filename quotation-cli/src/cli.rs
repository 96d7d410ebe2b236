use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use quotation_core::{
    BaseField, Driver, Origin, QuoteDetails, QuoteStatus, QuoteWorkflow, StatusTab, parse_decimal,
};
use rust_decimal::Decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Sales quotation pricing.
///
/// Prices quotes from whichever figure you fix (desired profit, sale price,
/// net profit, absolute profit or markup) and keeps a per-company record
/// of saved quotes.
#[derive(Debug, Parser)]
#[command(name = "quotation", version, about, long_about = None)]
pub struct Cli {
    /// Config file. Defaults to `quotation.toml` in the working directory.
    #[arg(long, env = "QUOTATION_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Database backend, overriding the config file.
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Database connection string, overriding the config file.
    /// For SQLite this is a file path (e.g. `quotes.db`) or `:memory:`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Log filter when `RUST_LOG` is unset (e.g. `debug`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a quote without saving it.
    Calc(PricingArgs),

    /// Validate and save a new quote.
    Save {
        #[command(flatten)]
        details: DetailsArgs,
        #[command(flatten)]
        pricing: PricingArgs,
        #[command(flatten)]
        workflow: WorkflowArgs,
    },

    /// Edit a saved quote and send it back for review.
    Update {
        id: i64,
        #[command(flatten)]
        details: DetailsArgs,
        #[command(flatten)]
        pricing: PricingArgs,
        #[command(flatten)]
        workflow: WorkflowArgs,
    },

    /// List saved quotes, newest first.
    List(ListArgs),

    /// Show one saved quote.
    Show { id: i64 },

    /// Change the review status of a quote (admins only, except `aguardando`).
    SetStatus {
        id: i64,
        #[arg(value_parser = parse_status)]
        status: QuoteStatus,
    },

    /// Delete a saved quote (admins only).
    Delete { id: i64 },

    /// Write the listed quotes as CSV.
    Export {
        #[command(flatten)]
        list: ListArgs,
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// ─── argument groups ─────────────────────────────────────────────────────────

/// A solvable or base field the user types into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Solvable(Driver),
    Base(BaseField),
}

/// One `FIELD=VALUE` edit. The value is kept as typed and coerced the way
/// the quote form coerces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub target: EditTarget,
    pub text: String,
}

impl FromStr for FieldEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, text) = s
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))?;

        let target = match (Driver::parse(field), BaseField::parse(field)) {
            (Some(driver), _) => EditTarget::Solvable(driver),
            (None, Some(base)) => EditTarget::Base(base),
            (None, None) => return Err(format!("unknown field '{}'", field.trim())),
        };

        Ok(Self {
            target,
            text: text.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct PricingArgs {
    /// Product origin: `nacional`/`domestic` or `importado`/`imported`.
    #[arg(long, value_parser = parse_origin)]
    pub origin: Option<Origin>,

    /// Field edit, applied in order (e.g. `--set product_cost=100
    /// --set desired_profit_pct=20`). The last solvable field set drives
    /// the price.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub edits: Vec<FieldEdit>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct DetailsArgs {
    /// Quote date (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub client: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub code: Option<String>,
    /// Product type.
    #[arg(long)]
    pub kind: Option<String>,
    #[arg(long, value_parser = parse_decimal)]
    pub quantity: Option<Decimal>,
    #[arg(long)]
    pub model: Option<String>,
}

impl DetailsArgs {
    /// Overwrites the fields that were given on the command line.
    pub fn apply(
        &self,
        details: &mut QuoteDetails,
    ) {
        if self.date.is_some() {
            details.date = self.date;
        }
        let texts = [
            (&self.city, &mut details.city),
            (&self.client, &mut details.client),
            (&self.brand, &mut details.brand),
            (&self.code, &mut details.code),
            (&self.kind, &mut details.kind),
            (&self.model, &mut details.model),
        ];
        for (arg, field) in texts {
            if let Some(value) = arg {
                *field = value.clone();
            }
        }
        if let Some(quantity) = self.quantity {
            details.quantity = quantity;
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct WorkflowArgs {
    /// Business id; generated as `calc_<millis>` when omitted on save.
    #[arg(long)]
    pub business_id: Option<String>,
    /// Free-form status note.
    #[arg(long)]
    pub status_note: Option<String>,
    #[arg(long)]
    pub responsible: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl WorkflowArgs {
    pub fn apply(
        &self,
        workflow: &mut QuoteWorkflow,
    ) {
        let fields = [
            (&self.business_id, &mut workflow.id),
            (&self.status_note, &mut workflow.status),
            (&self.responsible, &mut workflow.responsible),
            (&self.notes, &mut workflow.notes),
        ];
        for (arg, field) in fields {
            if arg.is_some() {
                *field = arg.clone();
            }
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// `all`, `awaiting`, `returned` or `closed`.
    #[arg(long, default_value = "all", value_parser = parse_tab)]
    pub tab: StatusTab,

    /// Case-insensitive search over client, city, brand, code, origin,
    /// type, model and id.
    #[arg(long, default_value = "")]
    pub search: String,
}

// ─── value parsers ───────────────────────────────────────────────────────────

fn parse_origin(s: &str) -> Result<Origin, String> {
    Origin::parse(s).ok_or_else(|| format!("unknown origin '{s}'"))
}

fn parse_status(s: &str) -> Result<QuoteStatus, String> {
    QuoteStatus::parse(s).ok_or_else(|| format!("unknown status '{s}'"))
}

fn parse_tab(s: &str) -> Result<StatusTab, String> {
    StatusTab::parse(s).ok_or_else(|| format!("unknown tab '{s}'"))
}
