use contracts::domain::a002_seller_connection::aggregate::SellerConnection;
use contracts::domain::a008_amazon_report::aggregate::{AmazonReport, CreateReportRequest};
use contracts::enums::report_type::{AdProduct, ReportType};
use contracts::usecases::u502_import_from_amazon_ads::request::{
    AdsCallbackRequest, CreateAdsReportRequest,
};
use contracts::usecases::u502_import_from_amazon_ads::response::{
    AdsAuthorizeUrlResponse, AdsProfile,
};
use moka::future::Cache;
use sea_orm::DatabaseConnection;

use super::ads_api_client::AdsApiClient;
use crate::domain::a002_seller_connection;
use crate::shared::error::ApiError;
use crate::usecases::u501_import_from_sp_api::executor as report_lifecycle;

/// Starts the Ads consent flow; the returned `state` is bound to the account
pub async fn authorize_url(
    client: &AdsApiClient,
    states: &Cache<String, String>,
    account_id: &str,
) -> AdsAuthorizeUrlResponse {
    let state = AdsApiClient::new_state();
    states.insert(state.clone(), account_id.to_string()).await;
    AdsAuthorizeUrlResponse {
        url: client.authorize_url(&state),
        state,
    }
}

/// Exchanges the consent code, stores the Ads refresh token on the seller
/// connection and picks the profile of the connection's marketplace
pub async fn complete_authorization(
    db: &DatabaseConnection,
    client: &AdsApiClient,
    states: &Cache<String, String>,
    account_id: &str,
    request: AdsCallbackRequest,
) -> Result<SellerConnection, ApiError> {
    match states.remove(&request.state).await {
        Some(owner) if owner == account_id => {}
        _ => {
            tracing::warn!("Ads callback with unknown or foreign state for {}", account_id);
            return Err(ApiError::field("state", "authorization state is invalid or expired"));
        }
    }
    if request.code.trim().is_empty() {
        return Err(ApiError::field("code", "code is required"));
    }

    let mut connection = a002_seller_connection::service::require(
        db,
        account_id,
        &request.asp_id,
        Some(&request.marketplace_id),
    )
    .await?;

    let tokens = client.exchange_code(request.code.trim()).await?;
    let refresh_token = tokens
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Upstream("token exchange returned no refresh token".into()))?;
    connection.ads_refresh_token = Some(refresh_token);

    let profiles = client.list_profiles(&connection).await?;
    connection.ads_profile_id = match_profile(&profiles, &connection.marketplace_id);
    if connection.ads_profile_id.is_none() {
        tracing::warn!(
            "No Ads profile for marketplace {} among {} profiles",
            connection.marketplace_id,
            profiles.len()
        );
    }

    a002_seller_connection::repository::set_ads_credentials(
        db,
        &connection.id,
        connection.ads_refresh_token.clone(),
        connection.ads_profile_id.clone(),
    )
    .await?;
    tracing::info!("Stored Ads authorization for {}", connection.asp_id);
    Ok(connection)
}

fn match_profile(profiles: &[AdsProfile], marketplace_id: &str) -> Option<String> {
    profiles
        .iter()
        .find(|p| {
            p.account_info
                .as_ref()
                .and_then(|info| info.marketplace_string_id.as_deref())
                == Some(marketplace_id)
        })
        .map(|p| p.profile_id.to_string())
}

pub async fn list_profiles(
    db: &DatabaseConnection,
    client: &AdsApiClient,
    account_id: &str,
    asp_id: &str,
    marketplace_id: Option<&str>,
) -> Result<Vec<AdsProfile>, ApiError> {
    let connection =
        a002_seller_connection::service::require(db, account_id, asp_id, marketplace_id).await?;
    Ok(client.list_profiles(&connection).await?)
}

fn report_type_for(ad_product: AdProduct) -> ReportType {
    match ad_product {
        AdProduct::SponsoredProducts => ReportType::SponsoredProducts,
        AdProduct::SponsoredBrands => ReportType::SponsoredBrands,
        AdProduct::SponsoredDisplay => ReportType::SponsoredDisplay,
    }
}

/// Requests a sponsored ads report; it then follows the regular report lifecycle
pub async fn create_ads_report(
    db: &DatabaseConnection,
    client: &AdsApiClient,
    account_id: &str,
    request: CreateAdsReportRequest,
) -> Result<AmazonReport, ApiError> {
    let request = CreateReportRequest {
        asp_id: request.asp_id,
        marketplace_id: request.marketplace_id,
        report_type: report_type_for(request.ad_product),
        data_start_date: request.start_date,
        data_end_date: request.end_date,
    };
    report_lifecycle::create_report(db, client, account_id, request).await
}
