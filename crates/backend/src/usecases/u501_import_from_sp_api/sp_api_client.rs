use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::domain::a002_seller_connection::aggregate::SellerConnection;
use contracts::domain::a008_amazon_report::aggregate::CreateReportRequest;
use contracts::enums::report_status::ReportStatus;
use contracts::enums::report_type::ReportType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::shared::config::AmazonConfig;
use crate::shared::marketplaces::amazon::lwa::{LwaApp, LwaClient};
use crate::shared::marketplaces::amazon::retry::send_with_retry;
use crate::shared::marketplaces::amazon::{maybe_gunzip, AmazonError, RemoteReport, ReportProvider};

const REPORTS_PATH: &str = "/reports/2021-06-30";
const FINANCES_PATH: &str = "/finances/v0/financialEvents";
const MAX_FINANCE_PAGES: usize = 50;

/// HTTP client for the Selling Partner API (Reports and Finances)
pub struct SpApiClient {
    http: reqwest::Client,
    lwa: Arc<LwaClient>,
    app: LwaApp,
    endpoint: Option<String>,
    retry_delay: Duration,
}

impl SpApiClient {
    pub fn new(http: reqwest::Client, config: &AmazonConfig, lwa: Arc<LwaClient>) -> Self {
        Self {
            http,
            lwa,
            app: LwaApp {
                client_id: config.lwa_client_id.clone(),
                client_secret: config.lwa_client_secret.clone(),
            },
            endpoint: config.sp_api_endpoint.clone(),
            retry_delay: Duration::from_secs(config.rate_limit_retry_secs),
        }
    }

    fn base_url(&self, connection: &SellerConnection) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| connection.region.sp_api_host().to_string())
    }

    async fn access_token(&self, connection: &SellerConnection) -> Result<String, AmazonError> {
        self.lwa
            .access_token(
                &format!("sp:{}", connection.asp_id),
                &self.app,
                &connection.sp_refresh_token,
            )
            .await
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        connection: &SellerConnection,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, AmazonError> {
        let token = self.access_token(connection).await?;
        let request = self
            .http
            .get(url)
            .header("x-amz-access-token", token)
            .query(query);
        let response = send_with_retry("sp-api", request, self.retry_delay).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse SP-API response from {}: {}", url, e);
            AmazonError::Decode(format!("{}: {}", url, e))
        })
    }

    /// Finances API events posted in `[posted_after, posted_before]`, all pages merged
    pub async fn list_financial_events(
        &self,
        connection: &SellerConnection,
        posted_after: NaiveDate,
        posted_before: NaiveDate,
    ) -> Result<FinancialEventGroups, AmazonError> {
        let url = format!("{}{}", self.base_url(connection), FINANCES_PATH);
        let mut merged = FinancialEventGroups::default();
        let mut next_token: Option<String> = None;

        for page in 0..MAX_FINANCE_PAGES {
            let mut query = vec![
                ("PostedAfter", format!("{}T00:00:00Z", posted_after)),
                ("PostedBefore", format!("{}T23:59:59Z", posted_before)),
                ("MaxResultsPerPage", "100".to_string()),
            ];
            if let Some(token) = &next_token {
                query.push(("NextToken", token.clone()));
            }

            let response: FinancialEventsResponse = self.get_json(connection, &url, &query).await?;
            let payload = response.payload.unwrap_or_default();
            tracing::info!(
                "Finances page {}: {} service fees, {} adjustments",
                page + 1,
                payload.financial_events.service_fee_event_list.len(),
                payload.financial_events.adjustment_event_list.len()
            );
            merged.extend(payload.financial_events);

            next_token = payload.next_token.filter(|t| !t.is_empty());
            if next_token.is_none() {
                return Ok(merged);
            }
        }

        tracing::warn!(
            "Stopped paging financial events for {} after {} pages",
            connection.asp_id,
            MAX_FINANCE_PAGES
        );
        Ok(merged)
    }
}

#[async_trait]
impl ReportProvider for SpApiClient {
    async fn request_report(
        &self,
        connection: &SellerConnection,
        request: &CreateReportRequest,
    ) -> Result<String, AmazonError> {
        let body = CreateReportBody {
            report_type: request.report_type.amazon_code(),
            marketplace_ids: vec![request.marketplace_id.clone()],
            data_start_time: format!("{}T00:00:00Z", request.data_start_date),
            data_end_time: format!("{}T23:59:59Z", request.data_end_date),
            report_options: report_options(request.report_type),
        };

        let token = self.access_token(connection).await?;
        let url = format!("{}{}/reports", self.base_url(connection), REPORTS_PATH);
        let http_request = self
            .http
            .post(&url)
            .header("x-amz-access-token", token)
            .json(&body);
        let response = send_with_retry("sp-api", http_request, self.retry_delay).await?;
        let created: CreateReportResponse = response
            .json()
            .await
            .map_err(|e| AmazonError::Decode(format!("createReport: {}", e)))?;

        tracing::info!(
            "Requested {} for {} as report {}",
            request.report_type,
            connection.asp_id,
            created.report_id
        );
        Ok(created.report_id)
    }

    async fn report_status(
        &self,
        connection: &SellerConnection,
        report_id: &str,
    ) -> Result<RemoteReport, AmazonError> {
        let url = format!(
            "{}{}/reports/{}",
            self.base_url(connection),
            REPORTS_PATH,
            urlencoding::encode(report_id)
        );
        let report: GetReportResponse = self.get_json(connection, &url, &[]).await?;
        let status = ReportStatus::from_code(&report.processing_status).ok_or_else(|| {
            AmazonError::Decode(format!("processingStatus {}", report.processing_status))
        })?;
        Ok(RemoteReport {
            status,
            document_id: report.report_document_id,
        })
    }

    async fn download_document(
        &self,
        connection: &SellerConnection,
        document_id: &str,
    ) -> Result<Vec<u8>, AmazonError> {
        let url = format!(
            "{}{}/documents/{}",
            self.base_url(connection),
            REPORTS_PATH,
            urlencoding::encode(document_id)
        );
        let document: ReportDocumentResponse = self.get_json(connection, &url, &[]).await?;

        // The document url is pre-signed and takes no access token
        let response =
            send_with_retry("sp-api-document", self.http.get(&document.url), self.retry_delay)
                .await?;
        let bytes = response.bytes().await?.to_vec();
        tracing::info!(
            "Downloaded document {} ({} bytes, compression {:?})",
            document_id,
            bytes.len(),
            document.compression_algorithm
        );
        maybe_gunzip(bytes)
    }
}

fn report_options(report_type: ReportType) -> Option<serde_json::Value> {
    match report_type {
        ReportType::SalesAndTraffic => Some(serde_json::json!({
            "dateGranularity": "DAY",
            "asinGranularity": "CHILD",
        })),
        _ => None,
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateReportBody {
    report_type: &'static str,
    marketplace_ids: Vec<String>,
    data_start_time: String,
    data_end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_options: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateReportResponse {
    report_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetReportResponse {
    processing_status: String,
    #[serde(default)]
    report_document_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportDocumentResponse {
    url: String,
    #[serde(default)]
    compression_algorithm: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FinancialEventsResponse {
    #[serde(default)]
    payload: Option<FinancialEventsPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FinancialEventsPayload {
    #[serde(default)]
    next_token: Option<String>,
    #[serde(default)]
    financial_events: FinancialEventGroups,
}

/// The Finances API event lists the backend stores
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FinancialEventGroups {
    #[serde(default)]
    pub service_fee_event_list: Vec<ServiceFeeEvent>,
    #[serde(default)]
    pub adjustment_event_list: Vec<AdjustmentEvent>,
}

impl FinancialEventGroups {
    fn extend(&mut self, other: FinancialEventGroups) {
        self.service_fee_event_list
            .extend(other.service_fee_event_list);
        self.adjustment_event_list.extend(other.adjustment_event_list);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceFeeEvent {
    #[serde(default)]
    pub amazon_order_id: Option<String>,
    #[serde(default)]
    pub fee_reason: Option<String>,
    #[serde(default)]
    pub seller_sku: Option<String>,
    #[serde(default)]
    pub fee_description: Option<String>,
    #[serde(default)]
    pub fee_list: Vec<FeeComponent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeeComponent {
    pub fee_type: String,
    pub fee_amount: Money,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdjustmentEvent {
    pub adjustment_type: String,
    #[serde(default)]
    pub posted_date: Option<String>,
    pub adjustment_amount: Money,
    #[serde(default)]
    pub adjustment_item_list: Vec<AdjustmentItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdjustmentItem {
    #[serde(default, rename = "SellerSKU")]
    pub seller_sku: Option<String>,
    #[serde(default)]
    pub product_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Money {
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub currency_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::marketplaces::amazon::lwa::TokenCache;
    use chrono::Utc;
    use contracts::enums::marketplace_type::AmazonRegion;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    fn client(url: &str) -> SpApiClient {
        let config = AmazonConfig {
            lwa_token_url: format!("{}/auth/o2/token", url),
            sp_api_endpoint: Some(url.to_string()),
            rate_limit_retry_secs: 0,
            ..AmazonConfig::default()
        };
        let http = reqwest::Client::new();
        let lwa = Arc::new(LwaClient::new(
            http.clone(),
            &config,
            TokenCache::new(Duration::from_secs(3600)),
        ));
        SpApiClient::new(http, &config, lwa)
    }

    fn connection() -> SellerConnection {
        let now = Utc::now();
        SellerConnection {
            id: "c1".into(),
            account_id: "acc-1".into(),
            asp_id: "A1SELLER".into(),
            marketplace_id: "ATVPDKIKX0DER".into(),
            region: AmazonRegion::Na,
            sp_refresh_token: "Atzr|refresh".into(),
            ads_refresh_token: None,
            ads_profile_id: None,
            created_at: now,
            updated_at: now,
            deactivated_at: None,
        }
    }

    async fn mock_token(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/auth/o2/token")
            .with_status(200)
            .with_body(r#"{"access_token":"Atza|access","token_type":"bearer","expires_in":3600}"#)
            .expect(1)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_report_status_and_gzip_document() {
        let mut server = mockito::Server::new_async().await;
        let token = mock_token(&mut server).await;
        let status = server
            .mock("GET", "/reports/2021-06-30/reports/R1")
            .match_header("x-amz-access-token", "Atza|access")
            .with_status(200)
            .with_body(r#"{"reportId":"R1","processingStatus":"DONE","reportDocumentId":"DOC-1"}"#)
            .create_async()
            .await;
        let document = server
            .mock("GET", "/reports/2021-06-30/documents/DOC-1")
            .with_status(200)
            .with_body(format!(
                r#"{{"reportDocumentId":"DOC-1","url":"{}/download/DOC-1","compressionAlgorithm":"GZIP"}}"#,
                server.url()
            ))
            .create_async()
            .await;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"amazon-order-id\tsku\n").unwrap();
        let download = server
            .mock("GET", "/download/DOC-1")
            .with_status(200)
            .with_body(encoder.finish().unwrap())
            .create_async()
            .await;

        let client = client(&server.url());
        let remote = client.report_status(&connection(), "R1").await.unwrap();
        assert_eq!(remote.status, ReportStatus::Done);
        assert_eq!(remote.document_id.as_deref(), Some("DOC-1"));

        let bytes = client.download_document(&connection(), "DOC-1").await.unwrap();
        assert_eq!(bytes, b"amazon-order-id\tsku\n");

        // The access token is cached across calls
        token.assert_async().await;
        status.assert_async().await;
        document.assert_async().await;
        download.assert_async().await;
    }

    #[tokio::test]
    async fn test_financial_events_follow_next_token() {
        let mut server = mockito::Server::new_async().await;
        mock_token(&mut server).await;
        let page_two = server
            .mock("GET", "/finances/v0/financialEvents")
            .match_query(mockito::Matcher::UrlEncoded("NextToken".into(), "T2".into()))
            .with_status(200)
            .with_body(
                r#"{"payload":{"FinancialEvents":{"AdjustmentEventList":[
                    {"AdjustmentType":"WAREHOUSE_DAMAGE","PostedDate":"2023-06-12T08:00:00Z",
                     "AdjustmentAmount":{"CurrencyCode":"USD","CurrencyAmount":14.5}}]}}}"#,
            )
            .create_async()
            .await;
        let page_one = server
            .mock("GET", "/finances/v0/financialEvents")
            .match_query(mockito::Matcher::Regex("MaxResultsPerPage=100$".into()))
            .with_status(200)
            .with_body(
                r#"{"payload":{"NextToken":"T2","FinancialEvents":{"ServiceFeeEventList":[
                    {"AmazonOrderId":"111-1","FeeReason":"Subscription","FeeList":[
                        {"FeeType":"Subscription","FeeAmount":{"CurrencyCode":"USD","CurrencyAmount":-39.99}}]}]}}}"#,
            )
            .create_async()
            .await;

        let groups = client(&server.url())
            .list_financial_events(
                &connection(),
                NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(groups.service_fee_event_list.len(), 1);
        assert_eq!(groups.adjustment_event_list.len(), 1);
        page_one.assert_async().await;
        page_two.assert_async().await;
    }
}
