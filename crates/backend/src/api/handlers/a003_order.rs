use axum::extract::State;
use contracts::domain::a003_order::aggregate::OrderListItem;
use contracts::shared::list_query::ListQuery;

use super::respond;
use crate::api::extract::ApiQuery;
use crate::domain::a003_order::service;
use crate::shared::analytics::date_range::DateRange;
use crate::shared::context::AppContext;
use crate::shared::error::{ApiError, ApiResult};
use crate::system::auth::extractor::CurrentAccount;

/// GET /api/orders?asp_id=...&from_date=...&to_date=...&limit=...&offset=...
pub async fn list(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<OrderListItem>> {
    let asp_id = query
        .asp_id()
        .ok_or_else(|| ApiError::field("asp_id", "is required"))?;
    let range = if query.from_date.is_some() || query.to_date.is_some() {
        Some(DateRange::parse(
            query.from_date.as_deref(),
            query.to_date.as_deref(),
        )?)
    } else {
        None
    };

    let orders = service::list_with_items(
        &ctx.db,
        &account.id,
        asp_id,
        range.as_ref(),
        query.limit,
        query.offset,
    )
    .await?;
    if orders.is_empty() {
        return Err(ApiError::NotFound);
    }
    respond("orders fetched", orders)
}
