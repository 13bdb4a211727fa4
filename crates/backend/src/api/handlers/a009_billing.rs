use axum::extract::{Path, State};
use axum::http::HeaderMap;
use contracts::domain::a009_billing::aggregate::{
    CreateSubscriptionRequest, PaymentWebhookEvent, Plan, Subscription,
};

use super::respond;
use crate::api::extract::ApiJson;
use crate::domain::a009_billing::service;
use crate::shared::context::AppContext;
use crate::shared::error::{ApiError, ApiResult};
use crate::system::auth::extractor::CurrentAccount;

pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// GET /api/billing/plans
pub async fn list_plans(State(ctx): State<AppContext>) -> ApiResult<Vec<Plan>> {
    let plans = service::list_plans(&ctx.db).await?;
    respond("plans fetched", plans)
}

/// POST /api/billing/subscriptions
pub async fn create_subscription(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(request): ApiJson<CreateSubscriptionRequest>,
) -> ApiResult<Subscription> {
    let subscription = service::create_subscription(&ctx.db, &account.id, request).await?;
    respond("subscription created", subscription)
}

/// POST /api/billing/subscriptions/:id/cancel
pub async fn cancel_subscription(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<String>,
) -> ApiResult<Subscription> {
    let subscription = service::cancel_subscription(&ctx.db, &account.id, &id).await?;
    respond("subscription cancelled", subscription)
}

/// A configured secret that matches the header; an empty secret accepts nothing
pub fn webhook_authorized(configured: &str, headers: &HeaderMap) -> bool {
    let presented = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    !configured.is_empty() && presented == configured
}

/// POST /api/billing/webhook
pub async fn payment_webhook(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    ApiJson(event): ApiJson<PaymentWebhookEvent>,
) -> ApiResult<Subscription> {
    if !webhook_authorized(&ctx.config.auth.webhook_secret, &headers) {
        tracing::warn!(
            "Rejected payment webhook for subscription {}",
            event.subscription_id
        );
        return Err(ApiError::Unauthorized("token_invalid"));
    }
    let subscription = service::apply_payment(&ctx.db, event).await?;
    respond("payment applied", subscription)
}
