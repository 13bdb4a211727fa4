use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use contracts::domain::a001_account::aggregate::Account;
use contracts::system::auth::TokenClaims;

use super::jwt;
use crate::domain::{a001_account, a009_billing};
use crate::shared::context::AppContext;
use crate::shared::error::ApiError;

pub const AUTHORIZATION_HEADER: &str = "x-authorization";
pub const ACCOUNT_HEADER: &str = "x-account";

/// Requires a valid token in `x-authorization`; stores the claims
pub async fn require_auth(
    State(ctx): State<AppContext>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok());
    let token = jwt::token_from_header(header)?;
    let claims = jwt::validate_token(&ctx.config.auth.jwt_secret, token)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Resolves the account named by `x-account` (or the user's default one).
/// Runs after `require_auth`.
pub async fn require_account(
    State(ctx): State<AppContext>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = req
        .extensions()
        .get::<TokenClaims>()
        .cloned()
        .ok_or(ApiError::Unauthorized("token_missing"))?;
    let requested = req
        .headers()
        .get(ACCOUNT_HEADER)
        .and_then(|h| h.to_str().ok());

    let account = a001_account::service::resolve_for_user(&ctx.db, &claims.sub, requested).await?;

    req.extensions_mut().insert(account);
    Ok(next.run(req).await)
}

/// Rejects accounts without a running subscription. Runs after `require_account`.
pub async fn require_active_subscription(
    State(ctx): State<AppContext>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let account_id = req
        .extensions()
        .get::<Account>()
        .map(|a| a.id.clone())
        .ok_or(ApiError::AccountRejected("account_not_found"))?;

    if !a009_billing::service::has_active_subscription(&ctx.db, &account_id).await? {
        return Err(ApiError::AccountRejected("subscription_inactive"));
    }
    Ok(next.run(req).await)
}
