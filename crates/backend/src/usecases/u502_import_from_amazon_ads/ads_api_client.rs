use async_trait::async_trait;
use contracts::domain::a002_seller_connection::aggregate::SellerConnection;
use contracts::domain::a008_amazon_report::aggregate::CreateReportRequest;
use contracts::enums::report_status::ReportStatus;
use contracts::enums::report_type::AdProduct;
use contracts::usecases::u502_import_from_amazon_ads::response::AdsProfile;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::shared::config::AmazonConfig;
use crate::shared::marketplaces::amazon::lwa::{LwaApp, LwaClient, LwaTokenResponse};
use crate::shared::marketplaces::amazon::retry::send_with_retry;
use crate::shared::marketplaces::amazon::{maybe_gunzip, AmazonError, RemoteReport, ReportProvider};

const ADS_SCOPE: &str = "advertising::campaign_management";
const CREATE_REPORT_CONTENT_TYPE: &str = "application/vnd.createasyncreportrequest.v3+json";

/// HTTP client for the Amazon Ads API (profiles and v3 async reports)
pub struct AdsApiClient {
    http: reqwest::Client,
    lwa: Arc<LwaClient>,
    app: LwaApp,
    authorize_url: String,
    redirect_uri: String,
    endpoint: Option<String>,
    retry_delay: Duration,
}

impl AdsApiClient {
    pub fn new(http: reqwest::Client, config: &AmazonConfig, lwa: Arc<LwaClient>) -> Self {
        Self {
            http,
            lwa,
            app: LwaApp {
                client_id: config.ads_client_id.clone(),
                client_secret: config.ads_client_secret.clone(),
            },
            authorize_url: config.ads_authorize_url.clone(),
            redirect_uri: config.ads_redirect_uri.clone(),
            endpoint: config.ads_api_endpoint.clone(),
            retry_delay: Duration::from_secs(config.rate_limit_retry_secs),
        }
    }

    /// Random value echoed back by the consent redirect
    pub fn new_state() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect()
    }

    /// Consent screen URL the seller is sent to
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&scope={}&response_type=code&redirect_uri={}&state={}",
            self.authorize_url,
            urlencoding::encode(&self.app.client_id),
            urlencoding::encode(ADS_SCOPE),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(state)
        )
    }

    pub async fn exchange_code(&self, code: &str) -> Result<LwaTokenResponse, AmazonError> {
        self.lwa
            .exchange_code(&self.app, code, &self.redirect_uri)
            .await
    }

    fn base_url(&self, connection: &SellerConnection) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| connection.region.ads_api_host().to_string())
    }

    async fn access_token(&self, connection: &SellerConnection) -> Result<String, AmazonError> {
        let refresh_token = connection
            .ads_refresh_token
            .as_deref()
            .ok_or(AmazonError::MissingCredential("Ads authorization"))?;
        self.lwa
            .access_token(&format!("ads:{}", connection.asp_id), &self.app, refresh_token)
            .await
    }

    async fn authorized(
        &self,
        request: reqwest::RequestBuilder,
        connection: &SellerConnection,
        with_profile: bool,
    ) -> Result<reqwest::RequestBuilder, AmazonError> {
        let token = self.access_token(connection).await?;
        let mut request = request
            .bearer_auth(token)
            .header("Amazon-Advertising-API-ClientId", &self.app.client_id);
        if with_profile {
            let profile_id = connection
                .ads_profile_id
                .as_deref()
                .ok_or(AmazonError::MissingCredential("Ads profile"))?;
            request = request.header("Amazon-Advertising-API-Scope", profile_id);
        }
        Ok(request)
    }

    /// Advertising profiles visible to the connection's Ads authorization
    pub async fn list_profiles(
        &self,
        connection: &SellerConnection,
    ) -> Result<Vec<AdsProfile>, AmazonError> {
        let url = format!("{}/v2/profiles", self.base_url(connection));
        let request = self.authorized(self.http.get(&url), connection, false).await?;
        let response = send_with_retry("ads-api", request, self.retry_delay).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Ads profiles: {}", e);
            AmazonError::Decode(format!("profiles: {}", e))
        })
    }
}

#[async_trait]
impl ReportProvider for AdsApiClient {
    async fn request_report(
        &self,
        connection: &SellerConnection,
        request: &CreateReportRequest,
    ) -> Result<String, AmazonError> {
        let ad_product = request.report_type.ad_product().ok_or_else(|| {
            AmazonError::Decode(format!("{} is not an Ads report", request.report_type))
        })?;
        let body = CreateAdsReportBody {
            name: format!(
                "{} {}..{}",
                request.report_type, request.data_start_date, request.data_end_date
            ),
            start_date: request.data_start_date.to_string(),
            end_date: request.data_end_date.to_string(),
            configuration: report_configuration(ad_product, request.report_type.amazon_code()),
        };

        let url = format!("{}/reporting/reports", self.base_url(connection));
        let http_request = self
            .authorized(self.http.post(&url), connection, true)
            .await?
            .header(reqwest::header::CONTENT_TYPE, CREATE_REPORT_CONTENT_TYPE)
            .body(
                serde_json::to_vec(&body)
                    .map_err(|e| AmazonError::Decode(format!("report body: {}", e)))?,
            );
        let response = send_with_retry("ads-api", http_request, self.retry_delay).await?;
        let created: AdsReportResponse = response
            .json()
            .await
            .map_err(|e| AmazonError::Decode(format!("createReport: {}", e)))?;
        tracing::info!(
            "Requested Ads {} report {} for {}",
            ad_product.code(),
            created.report_id,
            connection.asp_id
        );
        Ok(created.report_id)
    }

    async fn report_status(
        &self,
        connection: &SellerConnection,
        report_id: &str,
    ) -> Result<RemoteReport, AmazonError> {
        let url = format!(
            "{}/reporting/reports/{}",
            self.base_url(connection),
            urlencoding::encode(report_id)
        );
        let request = self.authorized(self.http.get(&url), connection, true).await?;
        let response = send_with_retry("ads-api", request, self.retry_delay).await?;
        let report: AdsReportResponse = response
            .json()
            .await
            .map_err(|e| AmazonError::Decode(format!("getReport: {}", e)))?;

        if let Some(reason) = &report.failure_reason {
            tracing::warn!("Ads report {} failed: {}", report_id, reason);
        }
        let status = ReportStatus::from_code(&report.status)
            .ok_or_else(|| AmazonError::Decode(format!("report status {}", report.status)))?;
        Ok(RemoteReport {
            status,
            document_id: report.url,
        })
    }

    /// `document_id` is the pre-signed download location
    async fn download_document(
        &self,
        _connection: &SellerConnection,
        document_id: &str,
    ) -> Result<Vec<u8>, AmazonError> {
        let response =
            send_with_retry("ads-api-document", self.http.get(document_id), self.retry_delay)
                .await?;
        let bytes = response.bytes().await?.to_vec();
        maybe_gunzip(bytes)
    }
}

fn report_configuration(ad_product: AdProduct, report_type_id: &'static str) -> ReportConfiguration {
    let (group_by, columns): (&[&str], &[&str]) = match ad_product {
        AdProduct::SponsoredProducts => (
            &["advertiser"],
            &[
                "date", "campaignId", "campaignName", "adGroupId", "advertisedAsin",
                "impressions", "clicks", "cost", "sales7d", "purchases7d", "unitsSoldClicks7d",
            ],
        ),
        AdProduct::SponsoredBrands => (
            &["campaign"],
            &[
                "date", "campaignId", "campaignName", "impressions", "clicks", "cost", "sales",
                "purchases", "unitsSold",
            ],
        ),
        AdProduct::SponsoredDisplay => (
            &["advertiser"],
            &[
                "date", "campaignId", "campaignName", "adGroupId", "promotedAsin", "impressions",
                "clicks", "cost", "sales", "purchases", "unitsSold",
            ],
        ),
    };
    ReportConfiguration {
        ad_product: ad_product.code(),
        group_by: group_by.to_vec(),
        columns: columns.to_vec(),
        report_type_id,
        time_unit: "DAILY",
        format: "GZIP_JSON",
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAdsReportBody {
    name: String,
    start_date: String,
    end_date: String,
    configuration: ReportConfiguration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportConfiguration {
    ad_product: &'static str,
    group_by: Vec<&'static str>,
    columns: Vec<&'static str>,
    report_type_id: &'static str,
    time_unit: &'static str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdsReportResponse {
    report_id: String,
    status: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    failure_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::marketplaces::amazon::lwa::TokenCache;
    use chrono::{NaiveDate, Utc};
    use contracts::enums::marketplace_type::AmazonRegion;
    use contracts::enums::report_type::ReportType;

    fn client(url: &str) -> AdsApiClient {
        let config = AmazonConfig {
            lwa_token_url: format!("{}/auth/o2/token", url),
            ads_api_endpoint: Some(url.to_string()),
            ads_authorize_url: "https://www.amazon.com/ap/oa".into(),
            ads_client_id: "amzn1.application-oa2-client.abc".into(),
            ads_redirect_uri: "https://app.example.com/ads/callback".into(),
            rate_limit_retry_secs: 0,
            ..AmazonConfig::default()
        };
        let http = reqwest::Client::new();
        let lwa = Arc::new(LwaClient::new(
            http.clone(),
            &config,
            TokenCache::new(Duration::from_secs(3600)),
        ));
        AdsApiClient::new(http, &config, lwa)
    }

    fn connection() -> SellerConnection {
        let now = Utc::now();
        SellerConnection {
            id: "c1".into(),
            account_id: "acc-1".into(),
            asp_id: "A1SELLER".into(),
            marketplace_id: "ATVPDKIKX0DER".into(),
            region: AmazonRegion::Na,
            sp_refresh_token: "Atzr|sp".into(),
            ads_refresh_token: Some("Atzr|ads".into()),
            ads_profile_id: Some("3001".into()),
            created_at: now,
            updated_at: now,
            deactivated_at: None,
        }
    }

    #[test]
    fn test_authorize_url_and_state() {
        let url = client("http://localhost").authorize_url("abc123");
        assert!(url.starts_with("https://www.amazon.com/ap/oa?client_id=amzn1.application-oa2-client.abc"));
        assert!(url.contains("scope=advertising%3A%3Acampaign_management"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fapp.example.com%2Fads%2Fcallback"));
        assert!(url.ends_with("&state=abc123"));

        let state = AdsApiClient::new_state();
        assert_eq!(state.len(), 32);
        assert_ne!(state, AdsApiClient::new_state());
    }

    #[tokio::test]
    async fn test_request_and_poll_report() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/o2/token")
            .with_status(200)
            .with_body(r#"{"access_token":"Atza|ads-access"}"#)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/reporting/reports")
            .match_header("Amazon-Advertising-API-Scope", "3001")
            .match_header("authorization", "Bearer Atza|ads-access")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"configuration":{"adProduct":"SPONSORED_PRODUCTS","reportTypeId":"spAdvertisedProduct"}}"#.into(),
            ))
            .with_status(200)
            .with_body(r#"{"reportId":"ads-r-1","status":"PENDING"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/reporting/reports/ads-r-1")
            .with_status(200)
            .with_body(r#"{"reportId":"ads-r-1","status":"COMPLETED","url":"https://s3.example.com/r1.json.gz"}"#)
            .create_async()
            .await;

        let client = client(&server.url());
        let request = CreateReportRequest {
            asp_id: "A1SELLER".into(),
            marketplace_id: "ATVPDKIKX0DER".into(),
            report_type: ReportType::SponsoredProducts,
            data_start_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            data_end_date: NaiveDate::from_ymd_opt(2023, 6, 7).unwrap(),
        };
        let report_id = client.request_report(&connection(), &request).await.unwrap();
        assert_eq!(report_id, "ads-r-1");
        create.assert_async().await;

        let remote = client.report_status(&connection(), "ads-r-1").await.unwrap();
        assert_eq!(remote.status, ReportStatus::Done);
        assert_eq!(
            remote.document_id.as_deref(),
            Some("https://s3.example.com/r1.json.gz")
        );
    }

    #[tokio::test]
    async fn test_missing_ads_authorization() {
        let mut conn = connection();
        conn.ads_refresh_token = None;
        let err = client("http://localhost").list_profiles(&conn).await.unwrap_err();
        assert!(matches!(err, AmazonError::MissingCredential(_)));
    }
}
