use anyhow::Result;
use chrono::NaiveDate;
use contracts::domain::a006_financial_event::aggregate::{FinancialEvent, FinancialEventType};
use contracts::domain::a008_amazon_report::aggregate::AmazonReport;
use contracts::usecases::u501_import_from_sp_api::response::IngestSummary;
use sea_orm::DatabaseConnection;

use super::{parse_report_date, read_flat_file};
use crate::domain::a006_financial_event;

/// FBA reimbursements become REIMBURSEMENT financial events keyed by
/// `reimbursement-id`. Rows without an approval date are dated with the end of
/// the report window.
pub fn parse(report: &AmazonReport, bytes: &[u8]) -> Result<Vec<FinancialEvent>> {
    let fallback_date: NaiveDate = report.data_end_date;
    Ok(read_flat_file(bytes)?
        .into_iter()
        .map(|row| FinancialEvent {
            account_id: report.account_id.clone(),
            asp_id: report.asp_id.clone(),
            az_order_id: row.text("amazon-order-id"),
            event_type: FinancialEventType::Reimbursement,
            event_id: row.text("reimbursement-id"),
            sku: row.opt("sku"),
            description: row.opt("reason"),
            amount: row.amount("amount-total"),
            currency: row.opt("currency-unit"),
            posted_date: row
                .get("approval-date")
                .and_then(parse_report_date)
                .unwrap_or(fallback_date),
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
    for event in &parse(report, bytes)? {
        match a006_financial_event::service::store(db, event).await? {
            Some(_) => summary.rows_ingested += 1,
            None => summary.rows_skipped += 1,
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a006_financial_event::repository;
    use crate::shared::data::db::test_support::memory_db;
    use crate::usecases::u501_import_from_sp_api::processors::test_report;
    use contracts::enums::report_type::ReportType;

    const FILE: &str = "approval-date\treimbursement-id\tcase-id\tamazon-order-id\treason\tsku\tfnsku\tasin\tcondition\tcurrency-unit\tamount-per-unit\tamount-total\tquantity-reimbursed-cash
2023-06-20T08:00:00+00:00\tRB-1\t\t111-1\tLost_Warehouse\tSKU-1\tX001\tB001\tNewItem\tUSD\t12.00\t24.00\t2
\tRB-2\t\t\tDamaged_Warehouse\tSKU-2\tX002\tB002\tNewItem\tUSD\t5.00\t5.00\t1
";

    #[tokio::test]
    async fn test_reimbursements_stored_as_events() {
        let db = memory_db().await;
        let report = test_report(ReportType::FbaReimbursements);
        let summary = process(&db, &report, FILE.as_bytes()).await.unwrap();
        process(&db, &report, FILE.as_bytes()).await.unwrap();
        assert_eq!(summary.rows_ingested, 2);

        let events = repository::list_by_type(&db, "acc-1", FinancialEventType::Reimbursement)
            .await
            .unwrap();
        assert_eq!(events.len(), 2);
        let total: f64 = events.iter().map(|e| e.amount).sum();
        assert_eq!(total, 29.0);
        assert!(events
            .iter()
            .any(|e| e.event_id == "RB-2" && e.posted_date == report.data_end_date));
    }
}
