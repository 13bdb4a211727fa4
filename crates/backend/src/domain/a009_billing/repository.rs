use anyhow::{anyhow, Result};
use contracts::domain::a009_billing::aggregate::{Payment, PaymentStatus, Plan, Subscription};
use contracts::enums::subscription_status::SubscriptionStatus;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

pub mod plan_row {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a009_plan")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub code: String,
        pub name: String,
        pub price: f64,
        pub currency: String,
        pub interval_months: i32,
        pub is_active: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod subscription_row {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a009_subscription")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub account_id: String,
        pub plan_id: String,
        pub status: String,
        pub started_at: Option<chrono::DateTime<chrono::Utc>>,
        pub ends_at: Option<chrono::DateTime<chrono::Utc>>,
        pub cancelled_at: Option<chrono::DateTime<chrono::Utc>>,
        pub created_at: chrono::DateTime<chrono::Utc>,
        pub updated_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod payment_row {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a009_payment")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub account_id: String,
        pub subscription_id: String,
        pub provider_payment_id: String,
        pub amount: f64,
        pub currency: String,
        pub status: String,
        pub created_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<plan_row::Model> for Plan {
    fn from(m: plan_row::Model) -> Self {
        Plan {
            id: m.id,
            code: m.code,
            name: m.name,
            price: m.price,
            currency: m.currency,
            interval_months: m.interval_months,
            is_active: m.is_active,
        }
    }
}

impl TryFrom<subscription_row::Model> for Subscription {
    type Error = anyhow::Error;

    fn try_from(m: subscription_row::Model) -> Result<Self> {
        Ok(Subscription {
            status: SubscriptionStatus::from_code(&m.status)
                .ok_or_else(|| anyhow!("unknown subscription status {}", m.status))?,
            id: m.id,
            account_id: m.account_id,
            plan_id: m.plan_id,
            started_at: m.started_at,
            ends_at: m.ends_at,
            cancelled_at: m.cancelled_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

impl TryFrom<payment_row::Model> for Payment {
    type Error = anyhow::Error;

    fn try_from(m: payment_row::Model) -> Result<Self> {
        Ok(Payment {
            status: PaymentStatus::from_code(&m.status)
                .ok_or_else(|| anyhow!("unknown payment status {}", m.status))?,
            id: m.id,
            account_id: m.account_id,
            subscription_id: m.subscription_id,
            provider_payment_id: m.provider_payment_id,
            amount: m.amount,
            currency: m.currency,
            created_at: m.created_at,
        })
    }
}

// ============================================================================
// Plans
// ============================================================================

pub async fn find_plan_by_code(db: &DatabaseConnection, code: &str) -> Result<Option<Plan>> {
    let model = plan_row::Entity::find()
        .filter(plan_row::Column::Code.eq(code))
        .one(db)
        .await?;
    Ok(model.map(Into::into))
}

pub async fn get_plan(db: &DatabaseConnection, id: &str) -> Result<Option<Plan>> {
    let model = plan_row::Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(model.map(Into::into))
}

pub async fn insert_plan(db: &DatabaseConnection, plan: &Plan) -> Result<()> {
    let active = plan_row::ActiveModel {
        id: Set(plan.id.clone()),
        code: Set(plan.code.clone()),
        name: Set(plan.name.clone()),
        price: Set(plan.price),
        currency: Set(plan.currency.clone()),
        interval_months: Set(plan.interval_months),
        is_active: Set(plan.is_active),
    };
    active.insert(db).await?;
    Ok(())
}

pub async fn list_active_plans(db: &DatabaseConnection) -> Result<Vec<Plan>> {
    let models = plan_row::Entity::find()
        .filter(plan_row::Column::IsActive.eq(true))
        .order_by_asc(plan_row::Column::Price)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Into::into).collect())
}

// ============================================================================
// Subscriptions
// ============================================================================

fn subscription_active(sub: &Subscription) -> subscription_row::ActiveModel {
    subscription_row::ActiveModel {
        id: Set(sub.id.clone()),
        account_id: Set(sub.account_id.clone()),
        plan_id: Set(sub.plan_id.clone()),
        status: Set(sub.status.code().to_string()),
        started_at: Set(sub.started_at),
        ends_at: Set(sub.ends_at),
        cancelled_at: Set(sub.cancelled_at),
        created_at: Set(sub.created_at),
        updated_at: Set(sub.updated_at),
    }
}

pub async fn insert_subscription(db: &DatabaseConnection, sub: &Subscription) -> Result<()> {
    subscription_active(sub).insert(db).await?;
    Ok(())
}

pub async fn update_subscription(db: &DatabaseConnection, sub: &Subscription) -> Result<()> {
    subscription_active(sub).update(db).await?;
    Ok(())
}

pub async fn get_subscription(db: &DatabaseConnection, id: &str) -> Result<Option<Subscription>> {
    let model = subscription_row::Entity::find_by_id(id.to_string())
        .one(db)
        .await?;
    model.map(TryInto::try_into).transpose()
}

pub async fn list_subscriptions_by_status(
    db: &DatabaseConnection,
    account_id: &str,
    status: SubscriptionStatus,
) -> Result<Vec<Subscription>> {
    let models = subscription_row::Entity::find()
        .filter(subscription_row::Column::AccountId.eq(account_id))
        .filter(subscription_row::Column::Status.eq(status.code()))
        .order_by_desc(subscription_row::Column::CreatedAt)
        .all(db)
        .await?;
    models.into_iter().map(TryInto::try_into).collect()
}

// ============================================================================
// Payments
// ============================================================================

pub async fn find_payment(
    db: &DatabaseConnection,
    provider_payment_id: &str,
) -> Result<Option<Payment>> {
    let model = payment_row::Entity::find()
        .filter(payment_row::Column::ProviderPaymentId.eq(provider_payment_id))
        .one(db)
        .await?;
    model.map(TryInto::try_into).transpose()
}

pub async fn insert_payment(db: &DatabaseConnection, payment: &Payment) -> Result<()> {
    let active = payment_row::ActiveModel {
        id: Set(payment.id.clone()),
        account_id: Set(payment.account_id.clone()),
        subscription_id: Set(payment.subscription_id.clone()),
        provider_payment_id: Set(payment.provider_payment_id.clone()),
        amount: Set(payment.amount),
        currency: Set(payment.currency.clone()),
        status: Set(payment.status.code().to_string()),
        created_at: Set(payment.created_at),
    };
    active.insert(db).await?;
    Ok(())
}
