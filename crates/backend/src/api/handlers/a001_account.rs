use axum::extract::State;
use contracts::domain::a001_account::aggregate::{Account, AccountDto};

use super::respond;
use crate::api::extract::ApiJson;
use crate::domain::a001_account::service;
use crate::shared::context::AppContext;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/accounts
pub async fn list(
    State(ctx): State<AppContext>,
    CurrentUser(claims): CurrentUser,
) -> ApiResult<Vec<Account>> {
    let accounts = service::list_for_owner(&ctx.db, &claims.sub).await?;
    respond("accounts fetched", accounts)
}

/// POST /api/accounts
pub async fn create(
    State(ctx): State<AppContext>,
    CurrentUser(claims): CurrentUser,
    ApiJson(dto): ApiJson<AccountDto>,
) -> ApiResult<Account> {
    let account = service::create(&ctx.db, &claims.sub, dto).await?;
    respond("account created", account)
}
