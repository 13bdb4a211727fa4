use contracts::domain::a008_amazon_report::aggregate::AmazonReport;
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::ApiError;

const DEFAULT_LIST_LIMIT: u64 = 100;

pub async fn get(
    db: &DatabaseConnection,
    account_id: &str,
    id: &str,
) -> Result<AmazonReport, ApiError> {
    repository::get(db, account_id, id)
        .await?
        .ok_or(ApiError::NotFound)
}

pub async fn list(
    db: &DatabaseConnection,
    account_id: &str,
    asp_id: Option<&str>,
    limit: Option<u64>,
) -> Result<Vec<AmazonReport>, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 1000);
    Ok(repository::list(db, account_id, asp_id, limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::memory_db;
    use chrono::NaiveDate;
    use contracts::domain::a008_amazon_report::aggregate::CreateReportRequest;
    use contracts::enums::report_type::ReportType;

    fn request() -> CreateReportRequest {
        CreateReportRequest {
            asp_id: "A1SELLER".into(),
            marketplace_id: "ATVPDKIKX0DER".into(),
            report_type: ReportType::AllOrders,
            data_start_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            data_end_date: NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_report_id_is_not_inserted_twice() {
        let db = memory_db().await;
        let first = AmazonReport::new_for_insert("acc-1".into(), &request(), "R1".into());
        let stored = repository::insert(&db, &first).await.unwrap();
        let again = AmazonReport::new_for_insert("acc-1".into(), &request(), "R1".into());
        let stored_again = repository::insert(&db, &again).await.unwrap();

        assert_eq!(stored.id, stored_again.id);
        assert_eq!(list(&db, "acc-1", None, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_other_account_cannot_read_report() {
        let db = memory_db().await;
        let report = AmazonReport::new_for_insert("acc-1".into(), &request(), "R1".into());
        repository::insert(&db, &report).await.unwrap();

        assert!(get(&db, "acc-1", &report.id).await.is_ok());
        assert!(matches!(
            get(&db, "acc-2", &report.id).await,
            Err(ApiError::NotFound)
        ));
    }
}
