use axum::extract::State;
use contracts::dashboards::d401_sales_overview::SalesOverviewResponse;
use contracts::shared::analytics::DashboardQuery;

use super::respond;
use crate::api::extract::ApiQuery;
use crate::dashboards::d401_sales_overview::service;
use crate::shared::context::AppContext;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentAccount;

/// GET /api/dashboard/sales-overview?asp_id=...&from_date=...&to_date=...
pub async fn get_sales_overview(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> ApiResult<SalesOverviewResponse> {
    let response = service::get_sales_overview(&ctx.db, &account.id, &query).await?;
    respond("sales overview computed", response)
}
