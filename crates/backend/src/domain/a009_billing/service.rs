use chrono::Utc;
use contracts::domain::a009_billing::aggregate::{
    CreateSubscriptionRequest, Payment, PaymentStatus, PaymentWebhookEvent, Plan, Subscription,
};
use contracts::enums::subscription_status::SubscriptionStatus;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use super::repository;
use crate::shared::error::ApiError;

/// Plans created on first start when missing: (code, name, monthly price)
const DEFAULT_PLANS: &[(&str, &str, f64)] = &[
    ("starter", "Starter", 29.0),
    ("growth", "Growth", 79.0),
    ("scale", "Scale", 199.0),
];

pub async fn seed_default_plans(db: &DatabaseConnection) -> anyhow::Result<()> {
    for (code, name, price) in DEFAULT_PLANS {
        if repository::find_plan_by_code(db, code).await?.is_some() {
            continue;
        }
        let plan = Plan {
            id: Uuid::new_v4().to_string(),
            code: code.to_string(),
            name: name.to_string(),
            price: *price,
            currency: "USD".to_string(),
            interval_months: 1,
            is_active: true,
        };
        repository::insert_plan(db, &plan).await?;
        tracing::info!("Seeded billing plan {}", code);
    }
    Ok(())
}

pub async fn list_plans(db: &DatabaseConnection) -> Result<Vec<Plan>, ApiError> {
    Ok(repository::list_active_plans(db).await?)
}

/// Creates a NEW subscription; it becomes ACTIVE once the provider confirms payment
pub async fn create_subscription(
    db: &DatabaseConnection,
    account_id: &str,
    request: CreateSubscriptionRequest,
) -> Result<Subscription, ApiError> {
    let plan = repository::get_plan(db, request.plan_id.trim())
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| ApiError::field("plan_id", "unknown plan"))?;

    let subscription = Subscription::new_for_insert(account_id.to_string(), plan.id);
    repository::insert_subscription(db, &subscription).await?;
    tracing::info!(
        "Created subscription {} for account {}",
        subscription.id,
        account_id
    );
    Ok(subscription)
}

pub async fn cancel_subscription(
    db: &DatabaseConnection,
    account_id: &str,
    subscription_id: &str,
) -> Result<Subscription, ApiError> {
    let mut subscription = repository::get_subscription(db, subscription_id)
        .await?
        .filter(|s| s.account_id == account_id)
        .ok_or(ApiError::NotFound)?;
    subscription
        .deactivate()
        .map_err(|e| ApiError::field("status", e))?;
    repository::update_subscription(db, &subscription).await?;
    Ok(subscription)
}

/// Records a provider payment once per `provider_payment_id`. A captured
/// payment activates the subscription and deactivates any other ACTIVE one of
/// the same account; on an ACTIVE subscription it extends `ends_at`.
pub async fn apply_payment(
    db: &DatabaseConnection,
    event: PaymentWebhookEvent,
) -> Result<Subscription, ApiError> {
    let mut subscription = repository::get_subscription(db, &event.subscription_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if repository::find_payment(db, &event.provider_payment_id)
        .await?
        .is_some()
    {
        tracing::info!(
            "Payment {} already recorded, ignoring replay",
            event.provider_payment_id
        );
        return Ok(subscription);
    }

    let payment = Payment {
        id: Uuid::new_v4().to_string(),
        account_id: subscription.account_id.clone(),
        subscription_id: subscription.id.clone(),
        provider_payment_id: event.provider_payment_id.clone(),
        amount: event.amount,
        currency: event.currency.clone(),
        status: event.status,
        created_at: Utc::now(),
    };
    repository::insert_payment(db, &payment).await?;

    match (event.status, subscription.status) {
        (PaymentStatus::Captured, SubscriptionStatus::New) => {
            let plan = repository::get_plan(db, &subscription.plan_id)
                .await?
                .ok_or(ApiError::NotFound)?;
            let others = repository::list_subscriptions_by_status(
                db,
                &subscription.account_id,
                SubscriptionStatus::Active,
            )
            .await?;
            for mut other in others.into_iter().filter(|s| s.id != subscription.id) {
                other
                    .deactivate()
                    .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;
                repository::update_subscription(db, &other).await?;
                tracing::info!("Deactivated superseded subscription {}", other.id);
            }
            subscription
                .activate(&plan)
                .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;
            repository::update_subscription(db, &subscription).await?;
        }
        (PaymentStatus::Captured, SubscriptionStatus::Active) => {
            let plan = repository::get_plan(db, &subscription.plan_id)
                .await?
                .ok_or(ApiError::NotFound)?;
            subscription
                .renew(&plan)
                .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;
            repository::update_subscription(db, &subscription).await?;
            tracing::info!(
                "Renewed subscription {} until {:?}",
                subscription.id,
                subscription.ends_at
            );
        }
        (PaymentStatus::Failed, SubscriptionStatus::New) => {
            subscription
                .deactivate()
                .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;
            repository::update_subscription(db, &subscription).await?;
        }
        (status, current) => {
            tracing::warn!(
                "Payment {} ({}) left subscription {} as {}",
                event.provider_payment_id,
                status.code(),
                subscription.id,
                current.code()
            );
        }
    }
    Ok(subscription)
}

/// True when the account has an ACTIVE subscription that has not run out
pub async fn has_active_subscription(
    db: &DatabaseConnection,
    account_id: &str,
) -> anyhow::Result<bool> {
    let now = Utc::now();
    let active =
        repository::list_subscriptions_by_status(db, account_id, SubscriptionStatus::Active)
            .await?;
    Ok(active
        .iter()
        .any(|s| s.ends_at.map(|end| end > now).unwrap_or(true)))
}
