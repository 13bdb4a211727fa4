use contracts::domain::a006_financial_event::aggregate::FinancialEvent;
use sea_orm::DatabaseConnection;

use super::repository;

/// Returns `None` when the event is invalid and was skipped
pub async fn store(
    db: &DatabaseConnection,
    event: &FinancialEvent,
) -> anyhow::Result<Option<bool>> {
    if let Err(e) = event.validate() {
        tracing::warn!("Skipping financial event: {}", e);
        return Ok(None);
    }
    Ok(Some(repository::upsert(db, event).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::memory_db;
    use chrono::NaiveDate;
    use contracts::domain::a006_financial_event::aggregate::FinancialEventType;

    fn reimbursement(amount: f64) -> FinancialEvent {
        FinancialEvent {
            account_id: "acc-1".into(),
            asp_id: "A1SELLER".into(),
            az_order_id: "111-1".into(),
            event_type: FinancialEventType::Reimbursement,
            event_id: "RB-1".into(),
            sku: Some("SKU-1".into()),
            description: Some("Lost:Warehouse".into()),
            amount,
            currency: Some("USD".into()),
            posted_date: NaiveDate::from_ymd_opt(2023, 6, 10).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_reingest_updates_in_place() {
        let db = memory_db().await;
        assert_eq!(store(&db, &reimbursement(12.0)).await.unwrap(), Some(true));
        assert_eq!(store(&db, &reimbursement(15.0)).await.unwrap(), Some(false));

        let rows = repository::list_by_type(&db, "acc-1", FinancialEventType::Reimbursement)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 15.0);
    }

    #[tokio::test]
    async fn test_invalid_event_is_skipped() {
        let db = memory_db().await;
        let mut event = reimbursement(1.0);
        event.event_id = " ".into();
        assert_eq!(store(&db, &event).await.unwrap(), None);
    }
}
