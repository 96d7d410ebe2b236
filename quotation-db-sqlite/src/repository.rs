use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use quotation_core::{
    CalculationState, NewQuote, Origin, Quote, QuoteDetails, QuoteRepository, QuoteStatus,
    QuoteWorkflow, RepositoryError,
};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::debug;

use crate::decimal::{decimal_to_text, get_decimal};

const QUOTE_COLUMNS: &str = "id, company, business_id, status, remote_status, responsible,
    created_by, notes, quote_date, city, client, brand, code, kind, quantity, model, origin,
    product_cost, freight, bank_slip_fee, commission_pct, tax_pct, difal_pct,
    desired_profit_pct, sale_price, net_profit, absolute_profit, markup_pct,
    difal_amount, commission_amount, tax_amount, cost_base, profit_at_20_pct, profit_at_30_pct,
    created_at, updated_at";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens `database_url`, creating the file if needed. Accepts a bare
    /// path, a `sqlite:` URL or `:memory:`.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database location: {}", database_url))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn get_text(
    row: &SqliteRow,
    column: &str,
) -> Result<String, RepositoryError> {
    row.try_get::<Option<String>, _>(column)
        .map(Option::unwrap_or_default)
        .map_err(|e| RepositoryError::Database(format!("Failed to get '{}': {}", column, e)))
}

fn get_optional_text(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<String>, RepositoryError> {
    row.try_get(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get '{}': {}", column, e)))
}

fn row_to_quote(row: &SqliteRow) -> Result<Quote, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(db_err)?;

    let remote_status = get_text(row, "remote_status")?;
    let remote_status = QuoteStatus::parse(&remote_status).ok_or_else(|| {
        RepositoryError::Database(format!("Invalid quote status: {}", remote_status))
    })?;
    let origin = get_text(row, "origin")?;
    let origin = Origin::parse(&origin)
        .ok_or_else(|| RepositoryError::Database(format!("Invalid origin: {}", origin)))?;

    let pricing = CalculationState {
        product_cost: get_decimal(row, "product_cost")?,
        freight: get_decimal(row, "freight")?,
        origin,
        bank_slip_fee: get_decimal(row, "bank_slip_fee")?,
        commission_pct: get_decimal(row, "commission_pct")?,
        tax_pct: get_decimal(row, "tax_pct")?,
        difal_pct: get_decimal(row, "difal_pct")?,
        desired_profit_pct: get_decimal(row, "desired_profit_pct")?,
        sale_price: get_decimal(row, "sale_price")?,
        net_profit: get_decimal(row, "net_profit")?,
        absolute_profit: get_decimal(row, "absolute_profit")?,
        markup_pct: get_decimal(row, "markup_pct")?,
        difal_amount: get_decimal(row, "difal_amount")?,
        commission_amount: get_decimal(row, "commission_amount")?,
        tax_amount: get_decimal(row, "tax_amount")?,
        cost_base: get_decimal(row, "cost_base")?,
        profit_at_20_pct: get_decimal(row, "profit_at_20_pct")?,
        profit_at_30_pct: get_decimal(row, "profit_at_30_pct")?,
        workflow: QuoteWorkflow {
            id: get_optional_text(row, "business_id")?,
            remote_id: Some(id),
            status: get_optional_text(row, "status")?,
            remote_status,
            responsible: get_optional_text(row, "responsible")?,
            created_by: get_optional_text(row, "created_by")?,
            notes: get_optional_text(row, "notes")?,
        },
    };

    Ok(Quote {
        id,
        company: get_text(row, "company")?,
        details: QuoteDetails {
            date: row
                .try_get::<Option<NaiveDate>, _>("quote_date")
                .map_err(|e| RepositoryError::Database(format!("Failed to get quote_date: {}", e)))?,
            city: get_text(row, "city")?,
            client: get_text(row, "client")?,
            brand: get_text(row, "brand")?,
            code: get_text(row, "code")?,
            kind: get_text(row, "kind")?,
            quantity: get_decimal(row, "quantity")?,
            model: get_text(row, "model")?,
        },
        pricing,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {}", e)))?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get updated_at: {}", e)))?,
    })
}

#[async_trait]
impl QuoteRepository for SqliteRepository {
    async fn create_quote(
        &self,
        company: &str,
        quote: NewQuote,
    ) -> Result<Quote, RepositoryError> {
        let now = Utc::now();
        let NewQuote {
            details, pricing, ..
        } = quote;
        let workflow = &pricing.workflow;

        let result = sqlx::query(
            "INSERT INTO quotes (
                company, business_id, status, remote_status, responsible, created_by, notes,
                quote_date, city, client, brand, code, kind, quantity, model, origin,
                product_cost, freight, bank_slip_fee, commission_pct, tax_pct, difal_pct,
                desired_profit_pct, sale_price, net_profit, absolute_profit, markup_pct,
                difal_amount, commission_amount, tax_amount, cost_base,
                profit_at_20_pct, profit_at_30_pct, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(company)
        .bind(&workflow.id)
        .bind(&workflow.status)
        .bind(workflow.remote_status.as_str())
        .bind(&workflow.responsible)
        .bind(&workflow.created_by)
        .bind(&workflow.notes)
        .bind(details.date)
        .bind(&details.city)
        .bind(&details.client)
        .bind(&details.brand)
        .bind(&details.code)
        .bind(&details.kind)
        .bind(decimal_to_text(details.quantity))
        .bind(&details.model)
        .bind(pricing.origin.as_str())
        .bind(decimal_to_text(pricing.product_cost))
        .bind(decimal_to_text(pricing.freight))
        .bind(decimal_to_text(pricing.bank_slip_fee))
        .bind(decimal_to_text(pricing.commission_pct))
        .bind(decimal_to_text(pricing.tax_pct))
        .bind(decimal_to_text(pricing.difal_pct))
        .bind(decimal_to_text(pricing.desired_profit_pct))
        .bind(decimal_to_text(pricing.sale_price))
        .bind(decimal_to_text(pricing.net_profit))
        .bind(decimal_to_text(pricing.absolute_profit))
        .bind(decimal_to_text(pricing.markup_pct))
        .bind(decimal_to_text(pricing.difal_amount))
        .bind(decimal_to_text(pricing.commission_amount))
        .bind(decimal_to_text(pricing.tax_amount))
        .bind(decimal_to_text(pricing.cost_base))
        .bind(decimal_to_text(pricing.profit_at_20_pct))
        .bind(decimal_to_text(pricing.profit_at_30_pct))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let id = result.last_insert_rowid();
        debug!(id, company, "inserted quote");
        self.get_quote(company, id).await
    }

    async fn get_quote(
        &self,
        company: &str,
        id: i64,
    ) -> Result<Quote, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE company = ? AND id = ?"
        ))
        .bind(company)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row_to_quote(&row)
    }

    async fn list_quotes(
        &self,
        company: &str,
        status: Option<QuoteStatus>,
    ) -> Result<Vec<Quote>, RepositoryError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {QUOTE_COLUMNS} FROM quotes
                     WHERE company = ? AND remote_status = ?
                     ORDER BY created_at DESC, id DESC"
                ))
                .bind(company)
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {QUOTE_COLUMNS} FROM quotes
                     WHERE company = ?
                     ORDER BY created_at DESC, id DESC"
                ))
                .bind(company)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_err)?;

        rows.iter().map(row_to_quote).collect()
    }

    async fn update_quote(
        &self,
        quote: &Quote,
    ) -> Result<(), RepositoryError> {
        let details = &quote.details;
        let pricing = &quote.pricing;
        let workflow = &pricing.workflow;

        let result = sqlx::query(
            "UPDATE quotes SET
                business_id = ?, status = ?, remote_status = ?, responsible = ?,
                created_by = ?, notes = ?,
                quote_date = ?, city = ?, client = ?, brand = ?, code = ?, kind = ?,
                quantity = ?, model = ?, origin = ?,
                product_cost = ?, freight = ?, bank_slip_fee = ?, commission_pct = ?,
                tax_pct = ?, difal_pct = ?,
                desired_profit_pct = ?, sale_price = ?, net_profit = ?, absolute_profit = ?,
                markup_pct = ?,
                difal_amount = ?, commission_amount = ?, tax_amount = ?, cost_base = ?,
                profit_at_20_pct = ?, profit_at_30_pct = ?,
                updated_at = ?
             WHERE company = ? AND id = ?",
        )
        .bind(&workflow.id)
        .bind(&workflow.status)
        .bind(workflow.remote_status.as_str())
        .bind(&workflow.responsible)
        .bind(&workflow.created_by)
        .bind(&workflow.notes)
        .bind(details.date)
        .bind(&details.city)
        .bind(&details.client)
        .bind(&details.brand)
        .bind(&details.code)
        .bind(&details.kind)
        .bind(decimal_to_text(details.quantity))
        .bind(&details.model)
        .bind(pricing.origin.as_str())
        .bind(decimal_to_text(pricing.product_cost))
        .bind(decimal_to_text(pricing.freight))
        .bind(decimal_to_text(pricing.bank_slip_fee))
        .bind(decimal_to_text(pricing.commission_pct))
        .bind(decimal_to_text(pricing.tax_pct))
        .bind(decimal_to_text(pricing.difal_pct))
        .bind(decimal_to_text(pricing.desired_profit_pct))
        .bind(decimal_to_text(pricing.sale_price))
        .bind(decimal_to_text(pricing.net_profit))
        .bind(decimal_to_text(pricing.absolute_profit))
        .bind(decimal_to_text(pricing.markup_pct))
        .bind(decimal_to_text(pricing.difal_amount))
        .bind(decimal_to_text(pricing.commission_amount))
        .bind(decimal_to_text(pricing.tax_amount))
        .bind(decimal_to_text(pricing.cost_base))
        .bind(decimal_to_text(pricing.profit_at_20_pct))
        .bind(decimal_to_text(pricing.profit_at_30_pct))
        .bind(Utc::now())
        .bind(&quote.company)
        .bind(quote.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn update_status(
        &self,
        company: &str,
        id: i64,
        status: QuoteStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE quotes SET remote_status = ?, updated_at = ? WHERE company = ? AND id = ?",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(company)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_quote(
        &self,
        company: &str,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM quotes WHERE company = ? AND id = ?")
            .bind(company)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
