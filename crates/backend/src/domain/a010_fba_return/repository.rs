use anyhow::Result;
use chrono::Utc;
use contracts::domain::a010_fba_return::aggregate::FbaReturn;
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a010_fba_return")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub asp_id: String,
    pub order_id: String,
    pub sku: String,
    pub asin: Option<String>,
    pub fnsku: Option<String>,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub fulfillment_center_id: Option<String>,
    pub detailed_disposition: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
    pub license_plate_number: String,
    pub return_date: Option<Date>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Upsert by `(account_id, asp_id, order_id, sku, license_plate_number)`
pub async fn upsert(db: &DatabaseConnection, row: &FbaReturn) -> Result<bool> {
    let existing = Entity::find()
        .filter(Column::AccountId.eq(&row.account_id))
        .filter(Column::AspId.eq(&row.asp_id))
        .filter(Column::OrderId.eq(&row.order_id))
        .filter(Column::Sku.eq(&row.sku))
        .filter(Column::LicensePlateNumber.eq(&row.license_plate_number))
        .one(db)
        .await?;

    let (id, is_new) = match existing {
        Some(m) => (m.id, false),
        None => (Uuid::new_v4().to_string(), true),
    };
    let active = ActiveModel {
        id: Set(id),
        account_id: Set(row.account_id.clone()),
        asp_id: Set(row.asp_id.clone()),
        order_id: Set(row.order_id.clone()),
        sku: Set(row.sku.clone()),
        asin: Set(row.asin.clone()),
        fnsku: Set(row.fnsku.clone()),
        product_name: Set(row.product_name.clone()),
        quantity: Set(row.quantity),
        fulfillment_center_id: Set(row.fulfillment_center_id.clone()),
        detailed_disposition: Set(row.detailed_disposition.clone()),
        reason: Set(row.reason.clone()),
        status: Set(row.status.clone()),
        license_plate_number: Set(row.license_plate_number.clone()),
        return_date: Set(row.return_date),
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
