use anyhow::Result;
use chrono::Utc;
use contracts::domain::a006_financial_event::aggregate::{FinancialEvent, FinancialEventType};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a006_financial_event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub asp_id: String,
    pub az_order_id: String,
    pub event_type: String,
    pub event_id: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    pub posted_date: Date,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    fn into_event(self) -> Option<FinancialEvent> {
        Some(FinancialEvent {
            event_type: FinancialEventType::from_code(&self.event_type)?,
            account_id: self.account_id,
            asp_id: self.asp_id,
            az_order_id: self.az_order_id,
            event_id: self.event_id,
            sku: self.sku,
            description: self.description,
            amount: self.amount,
            currency: self.currency,
            posted_date: self.posted_date,
        })
    }
}

/// Upsert by `(account_id, asp_id, az_order_id, event_type, event_id)`
pub async fn upsert(db: &DatabaseConnection, event: &FinancialEvent) -> Result<bool> {
    let existing = Entity::find()
        .filter(Column::AccountId.eq(&event.account_id))
        .filter(Column::AspId.eq(&event.asp_id))
        .filter(Column::AzOrderId.eq(&event.az_order_id))
        .filter(Column::EventType.eq(event.event_type.code()))
        .filter(Column::EventId.eq(&event.event_id))
        .one(db)
        .await?;

    let (id, is_new) = match existing {
        Some(m) => (m.id, false),
        None => (Uuid::new_v4().to_string(), true),
    };
    let active = ActiveModel {
        id: Set(id),
        account_id: Set(event.account_id.clone()),
        asp_id: Set(event.asp_id.clone()),
        az_order_id: Set(event.az_order_id.clone()),
        event_type: Set(event.event_type.code().to_string()),
        event_id: Set(event.event_id.clone()),
        sku: Set(event.sku.clone()),
        description: Set(event.description.clone()),
        amount: Set(event.amount),
        currency: Set(event.currency.clone()),
        posted_date: Set(event.posted_date),
        updated_at: Set(Utc::now()),
    };
    if is_new {
        active.insert(db).await?;
    } else {
        active.update(db).await?;
    }
    Ok(is_new)
}

pub async fn list_by_type(
    db: &DatabaseConnection,
    account_id: &str,
    event_type: FinancialEventType,
) -> Result<Vec<FinancialEvent>> {
    let rows = Entity::find()
        .filter(Column::AccountId.eq(account_id))
        .filter(Column::EventType.eq(event_type.code()))
        .order_by_asc(Column::PostedDate)
        .all(db)
        .await?;
    Ok(rows.into_iter().filter_map(Model::into_event).collect())
}
