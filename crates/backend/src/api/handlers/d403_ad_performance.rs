use axum::extract::State;
use contracts::dashboards::d403_ad_performance::AdPerformanceResponse;
use contracts::shared::analytics::DashboardQuery;

use super::respond;
use crate::api::extract::ApiQuery;
use crate::dashboards::d403_ad_performance::service;
use crate::shared::context::AppContext;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentAccount;

/// GET /api/dashboard/ad-performance?asp_id=...&from_date=...&to_date=...
pub async fn get_ad_performance(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> ApiResult<AdPerformanceResponse> {
    let response = service::get_ad_performance(&ctx.db, &account.id, &query).await?;
    respond("ad performance computed", response)
}
