use anyhow::Result;
use chrono::Utc;
use contracts::domain::a005_settlement::aggregate::SettlementLine;
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a005_settlement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub selling_partner_id: String,
    pub settlement_id: String,
    pub order_id: String,
    pub order_item_code: String,
    pub sku: Option<String>,
    pub transaction_type: String,
    pub amount_type: String,
    pub amount_description: String,
    pub amount: f64,
    pub currency: Option<String>,
    pub quantity: i64,
    pub posted_date: Option<Date>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Upsert by `(selling_partner_id, settlement_id, order_id, order_item_code,
/// amount_type, amount_description)`
pub async fn upsert(db: &DatabaseConnection, line: &SettlementLine) -> Result<bool> {
    let existing = Entity::find()
        .filter(Column::SellingPartnerId.eq(&line.selling_partner_id))
        .filter(Column::SettlementId.eq(&line.settlement_id))
        .filter(Column::OrderId.eq(&line.order_id))
        .filter(Column::OrderItemCode.eq(&line.order_item_code))
        .filter(Column::AmountType.eq(&line.amount_type))
        .filter(Column::AmountDescription.eq(&line.amount_description))
        .one(db)
        .await?;

    let (id, is_new) = match existing {
        Some(m) => (m.id, false),
        None => (Uuid::new_v4().to_string(), true),
    };
    let active = ActiveModel {
        id: Set(id),
        account_id: Set(line.account_id.clone()),
        selling_partner_id: Set(line.selling_partner_id.clone()),
        settlement_id: Set(line.settlement_id.clone()),
        order_id: Set(line.order_id.clone()),
        order_item_code: Set(line.order_item_code.clone()),
        sku: Set(line.sku.clone()),
        transaction_type: Set(line.transaction_type.clone()),
        amount_type: Set(line.amount_type.clone()),
        amount_description: Set(line.amount_description.clone()),
        amount: Set(line.amount),
        currency: Set(line.currency.clone()),
        quantity: Set(line.quantity),
        posted_date: Set(line.posted_date),
        updated_at: Set(Utc::now()),
    };
    if is_new {
        active.insert(db).await?;
    } else {
        active.update(db).await?;
    }
    Ok(is_new)
}

pub async fn count(db: &DatabaseConnection, account_id: &str) -> Result<u64> {
    Ok(Entity::find()
        .filter(Column::AccountId.eq(account_id))
        .count(db)
        .await?)
}
