use contracts::domain::a008_amazon_report::aggregate::{AmazonReport, CreateReportRequest};
use contracts::enums::report_status::ReportStatus;
use contracts::enums::report_type::ReportType;
use contracts::usecases::u501_import_from_sp_api::request::FinancesSyncRequest;
use contracts::usecases::u501_import_from_sp_api::response::IngestSummary;
use sea_orm::DatabaseConnection;

use super::processors;
use super::sp_api_client::SpApiClient;
use crate::domain::{a002_seller_connection, a008_amazon_report};
use crate::shared::error::ApiError;
use crate::shared::marketplaces::amazon::ReportProvider;
use crate::usecases::u502_import_from_amazon_ads::processors::sponsored_ads;

/// Requests the report from Amazon and starts tracking it in state NEW
pub async fn create_report(
    db: &DatabaseConnection,
    provider: &dyn ReportProvider,
    account_id: &str,
    request: CreateReportRequest,
) -> Result<AmazonReport, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::field("report", e))?;
    let connection = a002_seller_connection::service::require(
        db,
        account_id,
        &request.asp_id,
        Some(&request.marketplace_id),
    )
    .await?;

    let report_id = provider.request_report(&connection, &request).await?;
    let report = AmazonReport::new_for_insert(account_id.to_string(), &request, report_id);
    let stored = a008_amazon_report::repository::insert(db, &report).await?;
    tracing::info!(
        "Tracking {} report {} as {}",
        stored.report_type,
        stored.report_id,
        stored.id
    );
    Ok(stored)
}

/// Polls Amazon once and stores the new status. Terminal reports are returned
/// as they are.
pub async fn verify_report(
    db: &DatabaseConnection,
    provider: &dyn ReportProvider,
    account_id: &str,
    id: &str,
) -> Result<AmazonReport, ApiError> {
    let mut report = a008_amazon_report::service::get(db, account_id, id).await?;
    if report.status.is_terminal() {
        return Ok(report);
    }

    let connection = a002_seller_connection::service::require(
        db,
        account_id,
        &report.asp_id,
        Some(&report.marketplace_id),
    )
    .await?;
    let remote = provider.report_status(&connection, &report.report_id).await?;
    report
        .apply_status(remote.status, remote.document_id)
        .map_err(|e| {
            tracing::error!("Rejected status update: {}", e);
            ApiError::Upstream(e)
        })?;
    a008_amazon_report::repository::update(db, &report).await?;
    tracing::info!("Report {} is now {}", report.report_id, report.status);
    Ok(report)
}

/// Downloads a DONE report, ingests its rows and records the outcome
pub async fn retrieve_report(
    db: &DatabaseConnection,
    provider: &dyn ReportProvider,
    account_id: &str,
    id: &str,
) -> Result<AmazonReport, ApiError> {
    let mut report = a008_amazon_report::service::get(db, account_id, id).await?;
    let document_id = match (&report.status, &report.document_id) {
        (ReportStatus::Done, Some(document_id)) => document_id.clone(),
        _ => {
            return Err(ApiError::field(
                "status",
                format!("report is {}, it can only be retrieved once DONE", report.status),
            ))
        }
    };

    let connection = a002_seller_connection::service::require(
        db,
        account_id,
        &report.asp_id,
        Some(&report.marketplace_id),
    )
    .await?;
    let bytes = provider.download_document(&connection, &document_id).await?;
    let summary = ingest(db, &report, &bytes).await?;

    report.mark_processed(summary.rows_ingested);
    a008_amazon_report::repository::update(db, &report).await?;
    tracing::info!(
        "Ingested {} rows ({} skipped) from report {}",
        summary.rows_ingested,
        summary.rows_skipped,
        report.report_id
    );
    Ok(report)
}

/// Routes a downloaded document to the parser for its report type
pub async fn ingest(
    db: &DatabaseConnection,
    report: &AmazonReport,
    bytes: &[u8],
) -> anyhow::Result<IngestSummary> {
    match report.report_type {
        ReportType::AllOrders => processors::orders::process(db, report, bytes).await,
        ReportType::SettlementV2 => processors::settlements::process(db, report, bytes).await,
        ReportType::SalesAndTraffic => processors::sales_traffic::process(db, report, bytes).await,
        ReportType::FbaCustomerReturns => processors::fba_returns::process(db, report, bytes).await,
        ReportType::FbaReimbursements => {
            processors::reimbursements::process(db, report, bytes).await
        }
        ReportType::SponsoredProducts
        | ReportType::SponsoredBrands
        | ReportType::SponsoredDisplay => sponsored_ads::process(db, report, bytes).await,
    }
}

/// Pulls Finances API events for the window and upserts them
pub async fn sync_financial_events(
    db: &DatabaseConnection,
    client: &SpApiClient,
    account_id: &str,
    request: FinancesSyncRequest,
) -> Result<IngestSummary, ApiError> {
    if request.posted_after > request.posted_before {
        return Err(ApiError::field(
            "posted_after",
            "posted_after must not be after posted_before",
        ));
    }
    let connection = a002_seller_connection::service::require(
        db,
        account_id,
        &request.asp_id,
        Some(&request.marketplace_id),
    )
    .await?;

    let groups = client
        .list_financial_events(&connection, request.posted_after, request.posted_before)
        .await?;
    let events = processors::financial_events::map_events(
        account_id,
        &connection.asp_id,
        request.posted_before,
        &groups,
    );
    let summary = processors::financial_events::store(db, &events).await?;
    tracing::info!(
        "Synced {} financial events for {}",
        summary.rows_ingested,
        connection.asp_id
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a003_order;
    use crate::shared::data::db::test_support::memory_db;
    use crate::shared::marketplaces::amazon::{AmazonError, RemoteReport};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use contracts::domain::a002_seller_connection::aggregate::{
        SellerConnection, SellerConnectionDto,
    };
    use std::sync::Mutex;

    /// Replays a scripted sequence of statuses
    struct FakeProvider {
        statuses: Mutex<Vec<RemoteReport>>,
        document: Vec<u8>,
    }

    #[async_trait]
    impl ReportProvider for FakeProvider {
        async fn request_report(
            &self,
            _connection: &SellerConnection,
            _request: &CreateReportRequest,
        ) -> Result<String, AmazonError> {
            Ok("R-100".into())
        }

        async fn report_status(
            &self,
            _connection: &SellerConnection,
            _report_id: &str,
        ) -> Result<RemoteReport, AmazonError> {
            let mut statuses = self.statuses.lock().unwrap();
            Ok(statuses.remove(0))
        }

        async fn download_document(
            &self,
            _connection: &SellerConnection,
            document_id: &str,
        ) -> Result<Vec<u8>, AmazonError> {
            assert_eq!(document_id, "DOC-100");
            Ok(self.document.clone())
        }
    }

    const ORDERS: &str = "amazon-order-id\tpurchase-date\torder-status\tsku\tasin\tquantity\tcurrency\titem-price
111-1\t2023-06-10T10:00:00+00:00\tShipped\tSKU-1\tB001\t1\tUSD\t25.00
";

    async fn setup() -> DatabaseConnection {
        let db = memory_db().await;
        a002_seller_connection::service::connect(
            &db,
            "acc-1",
            SellerConnectionDto {
                asp_id: "A1SELLER".into(),
                marketplace_id: "ATVPDKIKX0DER".into(),
                sp_refresh_token: "Atzr|refresh".into(),
            },
        )
        .await
        .unwrap();
        db
    }

    fn request() -> CreateReportRequest {
        CreateReportRequest {
            asp_id: "A1SELLER".into(),
            marketplace_id: "ATVPDKIKX0DER".into(),
            report_type: ReportType::AllOrders,
            data_start_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            data_end_date: NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
        }
    }

    fn provider() -> FakeProvider {
        FakeProvider {
            statuses: Mutex::new(vec![
                RemoteReport {
                    status: ReportStatus::InProgress,
                    document_id: None,
                },
                RemoteReport {
                    status: ReportStatus::Done,
                    document_id: Some("DOC-100".into()),
                },
            ]),
            document: ORDERS.as_bytes().to_vec(),
        }
    }

    #[tokio::test]
    async fn test_create_verify_retrieve_lifecycle() {
        let db = setup().await;
        let provider = provider();

        let created = create_report(&db, &provider, "acc-1", request()).await.unwrap();
        assert_eq!(created.status, ReportStatus::New);
        assert!(created.document_id.is_none());

        let early = retrieve_report(&db, &provider, "acc-1", &created.id).await;
        assert!(matches!(early, Err(ApiError::Validation(_))));

        let polled = verify_report(&db, &provider, "acc-1", &created.id).await.unwrap();
        assert_eq!(polled.status, ReportStatus::InProgress);
        assert!(polled.document_id.is_none());

        let done = verify_report(&db, &provider, "acc-1", &created.id).await.unwrap();
        assert_eq!(done.status, ReportStatus::Done);
        assert_eq!(done.document_id.as_deref(), Some("DOC-100"));
        assert_eq!(done.id, created.id);

        let processed = retrieve_report(&db, &provider, "acc-1", &created.id).await.unwrap();
        assert_eq!(processed.rows_ingested, 1);
        assert!(processed.processed_at.is_some());

        let reports = a008_amazon_report::service::list(&db, "acc-1", None, None)
            .await
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(a003_order::repository::count_orders(&db, "acc-1").await.unwrap(), 1);

        // Terminal reports are not polled again
        let again = verify_report(&db, &provider, "acc-1", &created.id).await.unwrap();
        assert_eq!(again.status, ReportStatus::Done);
    }

    #[tokio::test]
    async fn test_create_requires_seller_connection() {
        let db = memory_db().await;
        let err = create_report(&db, &provider(), "acc-1", request())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
