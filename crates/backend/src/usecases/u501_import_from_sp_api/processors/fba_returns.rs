use anyhow::Result;
use contracts::domain::a008_amazon_report::aggregate::AmazonReport;
use contracts::domain::a010_fba_return::aggregate::FbaReturn;
use contracts::usecases::u501_import_from_sp_api::response::IngestSummary;
use sea_orm::DatabaseConnection;

use super::{parse_report_date, read_flat_file};
use crate::domain::a010_fba_return;

pub fn parse(report: &AmazonReport, bytes: &[u8]) -> Result<Vec<FbaReturn>> {
    Ok(read_flat_file(bytes)?
        .into_iter()
        .map(|row| FbaReturn {
            account_id: report.account_id.clone(),
            asp_id: report.asp_id.clone(),
            order_id: row.text("order-id"),
            sku: row.text("sku"),
            asin: row.opt("asin"),
            fnsku: row.opt("fnsku"),
            product_name: row.opt("product-name"),
            quantity: row.count("quantity"),
            fulfillment_center_id: row.opt("fulfillment-center-id"),
            detailed_disposition: row.opt("detailed-disposition"),
            reason: row.opt("reason"),
            status: row.opt("status"),
            license_plate_number: row.text("license-plate-number"),
            return_date: row.get("return-date").and_then(parse_report_date),
        })
        .collect())
}

pub async fn process(
    db: &DatabaseConnection,
    report: &AmazonReport,
    bytes: &[u8],
) -> Result<IngestSummary> {
    let mut summary = IngestSummary {
        rows_ingested: 0,
        rows_skipped: 0,
    };
    for row in &parse(report, bytes)? {
        match a010_fba_return::service::store(db, row).await? {
            Some(_) => summary.rows_ingested += 1,
            None => summary.rows_skipped += 1,
        }
    }
    Ok(summary)
}
