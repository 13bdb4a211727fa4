use axum::extract::State;
use contracts::domain::a002_seller_connection::aggregate::SellerConnection;
use contracts::domain::a008_amazon_report::aggregate::AmazonReport;
use contracts::shared::list_query::ListQuery;
use contracts::usecases::u502_import_from_amazon_ads::request::{
    AdsCallbackRequest, CreateAdsReportRequest,
};
use contracts::usecases::u502_import_from_amazon_ads::response::{
    AdsAuthorizeUrlResponse, AdsProfile,
};

use super::respond;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::shared::context::AppContext;
use crate::shared::error::{ApiError, ApiResult};
use crate::system::auth::extractor::CurrentAccount;
use crate::usecases::u502_import_from_amazon_ads::executor;

/// GET /api/ads/authorize-url
pub async fn authorize_url(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
) -> ApiResult<AdsAuthorizeUrlResponse> {
    let response = executor::authorize_url(&ctx.ads, &ctx.oauth_states, &account.id).await;
    respond("authorize url issued", response)
}

/// POST /api/ads/callback
pub async fn callback(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(request): ApiJson<AdsCallbackRequest>,
) -> ApiResult<SellerConnection> {
    let connection = executor::complete_authorization(
        &ctx.db,
        &ctx.ads,
        &ctx.oauth_states,
        &account.id,
        request,
    )
    .await?;
    respond("ads account connected", connection)
}

/// GET /api/ads/profiles?asp_id=...&marketplace_id=...
pub async fn list_profiles(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<AdsProfile>> {
    let asp_id = query
        .asp_id()
        .ok_or_else(|| ApiError::field("asp_id", "is required"))?;
    let profiles = executor::list_profiles(
        &ctx.db,
        &ctx.ads,
        &account.id,
        asp_id,
        query.marketplace_id.as_deref(),
    )
    .await?;
    respond("ads profiles fetched", profiles)
}

/// POST /api/ads/reports
pub async fn create_report(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(request): ApiJson<CreateAdsReportRequest>,
) -> ApiResult<AmazonReport> {
    let report = executor::create_ads_report(&ctx.db, &ctx.ads, &account.id, request).await?;
    respond("ads report requested", report)
}
