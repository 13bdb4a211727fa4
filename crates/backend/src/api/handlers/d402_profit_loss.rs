use axum::extract::State;
use contracts::dashboards::d402_profit_loss::ProfitLossResponse;
use contracts::shared::analytics::DashboardQuery;

use super::respond;
use crate::api::extract::ApiQuery;
use crate::dashboards::d402_profit_loss::service;
use crate::shared::context::AppContext;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentAccount;

/// GET /api/dashboard/profit-loss?asp_id=...&from_date=...&to_date=...
pub async fn get_profit_loss(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> ApiResult<ProfitLossResponse> {
    let response = service::get_profit_loss(&ctx.db, &account.id, &query).await?;
    respond("profit and loss computed", response)
}
