//! CSV export of saved quotes.
//!
//! One row per quote, headers matched by name on import into a
//! spreadsheet. Decimals are written with two places.

use std::io::Write;

use quotation_core::Quote;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct QuoteRecord<'a> {
    id: i64,
    business_id: &'a str,
    date: String,
    client: &'a str,
    city: &'a str,
    brand: &'a str,
    code: &'a str,
    kind: &'a str,
    model: &'a str,
    quantity: String,
    origin: &'static str,
    product_cost: String,
    freight: String,
    cost_base: String,
    sale_price: String,
    net_profit: String,
    desired_profit_pct: String,
    markup_pct: String,
    status: &'static str,
    created_by: &'a str,
}

fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

impl<'a> From<&'a Quote> for QuoteRecord<'a> {
    fn from(quote: &'a Quote) -> Self {
        let details = &quote.details;
        let pricing = &quote.pricing;
        let workflow = &pricing.workflow;

        Self {
            id: quote.id,
            business_id: workflow.id.as_deref().unwrap_or_default(),
            date: details.date.map(|d| d.to_string()).unwrap_or_default(),
            client: &details.client,
            city: &details.city,
            brand: &details.brand,
            code: &details.code,
            kind: &details.kind,
            model: &details.model,
            quantity: details.quantity.normalize().to_string(),
            origin: pricing.origin.as_str(),
            product_cost: money(pricing.product_cost),
            freight: money(pricing.freight),
            cost_base: money(pricing.cost_base),
            sale_price: money(pricing.sale_price),
            net_profit: money(pricing.net_profit),
            desired_profit_pct: money(pricing.desired_profit_pct),
            markup_pct: money(pricing.markup_pct),
            status: workflow.remote_status.as_str(),
            created_by: workflow.created_by.as_deref().unwrap_or_default(),
        }
    }
}

/// Writes `quotes` with a header row. Returns the number of data rows.
pub fn write_csv<W: Write>(
    writer: W,
    quotes: &[Quote],
) -> Result<usize, csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    for quote in quotes {
        csv.serialize(QuoteRecord::from(quote))?;
    }
    csv.flush()?;
    Ok(quotes.len())
}
