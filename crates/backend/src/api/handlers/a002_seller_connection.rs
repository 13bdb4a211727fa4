use axum::extract::State;
use contracts::domain::a002_seller_connection::aggregate::{SellerConnection, SellerConnectionDto};

use super::respond;
use crate::api::extract::ApiJson;
use crate::domain::a002_seller_connection::service;
use crate::shared::context::AppContext;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentAccount;

/// GET /api/seller-connections
pub async fn list(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
) -> ApiResult<Vec<SellerConnection>> {
    let connections = service::list(&ctx.db, &account.id).await?;
    respond("seller connections fetched", connections)
}

/// POST /api/seller-connections
pub async fn connect(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(dto): ApiJson<SellerConnectionDto>,
) -> ApiResult<SellerConnection> {
    let connection = service::connect(&ctx.db, &account.id, dto).await?;
    respond("seller connected", connection)
}
