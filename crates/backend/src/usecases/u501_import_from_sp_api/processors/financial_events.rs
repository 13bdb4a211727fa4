use anyhow::Result;
use chrono::NaiveDate;
use contracts::domain::a006_financial_event::aggregate::{FinancialEvent, FinancialEventType};
use contracts::usecases::u501_import_from_sp_api::response::IngestSummary;
use sea_orm::DatabaseConnection;

use super::parse_report_date;
use crate::domain::a006_financial_event;
use crate::usecases::u501_import_from_sp_api::sp_api_client::FinancialEventGroups;

/// Flattens Finances API events. Service fees carry no posting date and are
/// dated with `window_end`; event ids are derived from the event content so a
/// re-sync lands on the same rows.
///
/// Adjustments, warehouse reimbursements included, are kept as ADJUSTMENT.
/// REIMBURSEMENT rows come only from the FBA reimbursements report.
pub fn map_events(
    account_id: &str,
    asp_id: &str,
    window_end: NaiveDate,
    groups: &FinancialEventGroups,
) -> Vec<FinancialEvent> {
    let mut events = Vec::new();

    for fee_event in &groups.service_fee_event_list {
        let order_id = fee_event.amazon_order_id.clone().unwrap_or_default();
        let reason = fee_event.fee_reason.clone().unwrap_or_default();
        for fee in &fee_event.fee_list {
            events.push(FinancialEvent {
                account_id: account_id.to_string(),
                asp_id: asp_id.to_string(),
                az_order_id: order_id.clone(),
                event_type: FinancialEventType::ServiceFee,
                event_id: format!("{}:{}:{}", reason, fee.fee_type, window_end),
                sku: fee_event.seller_sku.clone(),
                description: fee_event.fee_description.clone().or(Some(fee.fee_type.clone())),
                amount: fee.fee_amount.currency_amount,
                currency: fee.fee_amount.currency_code.clone(),
                posted_date: window_end,
            });
        }
    }

    for adjustment in &groups.adjustment_event_list {
        let posted_raw = adjustment.posted_date.clone().unwrap_or_default();
        let item = adjustment.adjustment_item_list.first();
        events.push(FinancialEvent {
            account_id: account_id.to_string(),
            asp_id: asp_id.to_string(),
            az_order_id: String::new(),
            event_type: FinancialEventType::Adjustment,
            event_id: format!(
                "{}:{}:{}",
                adjustment.adjustment_type,
                posted_raw,
                adjustment.adjustment_amount.currency_amount
            ),
            sku: item.and_then(|i| i.seller_sku.clone()),
            description: item
                .and_then(|i| i.product_description.clone())
                .or(Some(adjustment.adjustment_type.clone())),
            amount: adjustment.adjustment_amount.currency_amount,
            currency: adjustment.adjustment_amount.currency_code.clone(),
            posted_date: parse_report_date(&posted_raw).unwrap_or(window_end),
        });
    }

    events
}

pub async fn store(db: &DatabaseConnection, events: &[FinancialEvent]) -> Result<IngestSummary> {
    let mut summary = IngestSummary {
        rows_ingested: 0,
        rows_skipped: 0,
    };
    for event in events {
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

    fn groups() -> FinancialEventGroups {
        serde_json::from_str(
            r#"{
                "ServiceFeeEventList": [{
                    "AmazonOrderId": "111-1",
                    "FeeReason": "Subscription",
                    "FeeList": [
                        {"FeeType": "Subscription", "FeeAmount": {"CurrencyCode": "USD", "CurrencyAmount": -39.99}},
                        {"FeeType": "Storage", "FeeAmount": {"CurrencyCode": "USD", "CurrencyAmount": -3.5}}
                    ]
                }],
                "AdjustmentEventList": [
                    {"AdjustmentType": "WAREHOUSE_DAMAGE", "PostedDate": "2023-06-12T08:00:00Z",
                     "AdjustmentAmount": {"CurrencyCode": "USD", "CurrencyAmount": 14.5},
                     "AdjustmentItemList": [{"SellerSKU": "SKU-1", "ProductDescription": "Kettle"}]},
                    {"AdjustmentType": "PostageBilling_Postage", "PostedDate": "2023-06-13T08:00:00Z",
                     "AdjustmentAmount": {"CurrencyCode": "USD", "CurrencyAmount": -4.0}}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_map_events() {
        let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
        let events = map_events("acc-1", "A1SELLER", end, &groups());
        assert_eq!(events.len(), 4);

        let fees: Vec<_> = events
            .iter()
            .filter(|e| e.event_type == FinancialEventType::ServiceFee)
            .collect();
        assert_eq!(fees.len(), 2);
        assert_ne!(fees[0].event_id, fees[1].event_id);
        assert_eq!(fees[0].posted_date, end);

        let damage = events
            .iter()
            .find(|e| e.sku.as_deref() == Some("SKU-1"))
            .unwrap();
        assert_eq!(damage.event_type, FinancialEventType::Adjustment);
        assert_eq!(damage.posted_date, NaiveDate::from_ymd_opt(2023, 6, 12).unwrap());
        assert!(events
            .iter()
            .all(|e| e.event_type != FinancialEventType::Reimbursement));
        assert!(events
            .iter()
            .any(|e| e.event_type == FinancialEventType::Adjustment && e.amount == -4.0));
    }

    #[tokio::test]
    async fn test_reimbursement_counted_once_across_report_and_finances() {
        use crate::shared::analytics::aggregator::{aggregate, MetricFilters, Scope};
        use crate::shared::analytics::date_range::DateRange;
        use crate::shared::data::db::test_support::memory_db;
        use crate::usecases::u501_import_from_sp_api::processors::{reimbursements, test_report};
        use contracts::enums::report_type::ReportType;

        let db = memory_db().await;
        let report = test_report(ReportType::FbaReimbursements);
        let file = "approval-date\treimbursement-id\tamazon-order-id\treason\tsku\tcurrency-unit\tamount-total
2023-06-12T08:00:00+00:00\tRB-9\t\tDamaged_Warehouse\tSKU-1\tUSD\t14.50
";
        reimbursements::process(&db, &report, file.as_bytes())
            .await
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
        store(&db, &map_events("acc-1", "A1SELLER", end, &groups()))
            .await
            .unwrap();

        let scope = Scope {
            account_id: "acc-1".into(),
            asp_id: "A1SELLER".into(),
            marketplace_id: None,
        };
        let june = DateRange::new(NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(), end);
        let sums = aggregate(&db, &scope, &june, &MetricFilters::default())
            .await
            .unwrap();
        assert_eq!(sums.reimbursement, 14.5);
    }

    #[test]
    fn test_event_ids_are_stable() {
        let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
        let first = map_events("acc-1", "A1SELLER", end, &groups());
        let second = map_events("acc-1", "A1SELLER", end, &groups());
        let ids = |v: &[FinancialEvent]| v.iter().map(|e| e.event_id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }
}
