use axum::extract::State;
use contracts::dashboards::d404_marketplace_breakdown::MarketplaceBreakdownResponse;
use contracts::shared::analytics::DashboardQuery;

use super::respond;
use crate::api::extract::ApiQuery;
use crate::dashboards::d404_marketplace_breakdown::service;
use crate::shared::context::AppContext;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentAccount;

/// GET /api/dashboard/marketplace-breakdown?asp_id=...&from_date=...&to_date=...
pub async fn get_marketplace_breakdown(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> ApiResult<MarketplaceBreakdownResponse> {
    let response = service::get_marketplace_breakdown(&ctx.db, &account.id, &query).await?;
    respond("marketplace breakdown computed", response)
}
