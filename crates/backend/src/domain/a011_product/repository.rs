use anyhow::Result;
use chrono::Utc;
use contracts::domain::a011_product::aggregate::Product;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a011_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub asp_id: String,
    pub asin: String,
    pub sku: Option<String>,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub unit_cost: f64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        Product {
            account_id: m.account_id,
            asp_id: m.asp_id,
            asin: m.asin,
            sku: m.sku,
            title: m.title,
            brand: m.brand,
            category: m.category,
            unit_cost: m.unit_cost,
        }
    }
}

/// Upsert by `(account_id, asp_id, asin)`
pub async fn upsert(db: &DatabaseConnection, product: &Product) -> Result<bool> {
    let existing = Entity::find()
        .filter(Column::AccountId.eq(&product.account_id))
        .filter(Column::AspId.eq(&product.asp_id))
        .filter(Column::Asin.eq(&product.asin))
        .one(db)
        .await?;

    let (id, is_new) = match existing {
        Some(m) => (m.id, false),
        None => (Uuid::new_v4().to_string(), true),
    };
    let active = ActiveModel {
        id: Set(id),
        account_id: Set(product.account_id.clone()),
        asp_id: Set(product.asp_id.clone()),
        asin: Set(product.asin.clone()),
        sku: Set(product.sku.clone()),
        title: Set(product.title.clone()),
        brand: Set(product.brand.clone()),
        category: Set(product.category.clone()),
        unit_cost: Set(product.unit_cost),
        updated_at: Set(Utc::now()),
    };
    if is_new {
        active.insert(db).await?;
    } else {
        active.update(db).await?;
    }
    Ok(is_new)
}

pub async fn list(
    db: &DatabaseConnection,
    account_id: &str,
    asp_id: Option<&str>,
) -> Result<Vec<Product>> {
    let mut query = Entity::find().filter(Column::AccountId.eq(account_id));
    if let Some(asp_id) = asp_id.filter(|s| !s.trim().is_empty()) {
        query = query.filter(Column::AspId.eq(asp_id));
    }
    let rows = query.order_by_asc(Column::Asin).all(db).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}
