use anyhow::Result;
use contracts::domain::a005_settlement::aggregate::SettlementLine;
use contracts::domain::a008_amazon_report::aggregate::AmazonReport;
use contracts::usecases::u501_import_from_sp_api::response::IngestSummary;
use sea_orm::DatabaseConnection;

use super::{parse_report_date, read_flat_file};
use crate::domain::a005_settlement;

/// Parses a V2 settlement flat file. The first data row is the settlement
/// summary; it only contributes the currency shared by every line.
pub fn parse(report: &AmazonReport, bytes: &[u8]) -> Result<Vec<SettlementLine>> {
    let mut currency: Option<String> = None;
    let mut lines = Vec::new();

    for row in read_flat_file(bytes)? {
        if let Some(c) = row.opt("currency") {
            currency = Some(c);
        }
        let Some(transaction_type) = row.opt("transaction-type") else {
            continue;
        };

        lines.push(SettlementLine {
            account_id: report.account_id.clone(),
            selling_partner_id: report.asp_id.clone(),
            settlement_id: row.text("settlement-id"),
            order_id: row.text("order-id"),
            order_item_code: row.text("order-item-code"),
            sku: row.opt("sku"),
            transaction_type,
            amount_type: row.text("amount-type"),
            amount_description: row.text("amount-description"),
            amount: row.amount("amount"),
            currency: currency.clone(),
            quantity: row.count("quantity-purchased"),
            posted_date: row
                .get("posted-date")
                .or_else(|| row.get("posted-date-time"))
                .and_then(parse_report_date),
        });
    }
    Ok(lines)
}

pub async fn process(
    db: &DatabaseConnection,
    report: &AmazonReport,
    bytes: &[u8],
) -> Result<IngestSummary> {
    let lines = parse(report, bytes)?;
    let mut summary = IngestSummary {
        rows_ingested: 0,
        rows_skipped: 0,
    };
    for line in &lines {
        match a005_settlement::service::store(db, line).await? {
            Some(_) => summary.rows_ingested += 1,
            None => summary.rows_skipped += 1,
        }
    }
    Ok(summary)
}
