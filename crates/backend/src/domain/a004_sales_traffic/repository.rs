use anyhow::Result;
use chrono::Utc;
use contracts::domain::a004_sales_traffic::aggregate::{SalesTrafficAsin, SalesTrafficSummary};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

pub mod summary_row {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a004_sales_traffic_summary")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub account_id: String,
        pub asp_id: String,
        pub marketplace_id: String,
        pub date: Date,
        pub ordered_product_sales: f64,
        pub currency: Option<String>,
        pub units_ordered: i64,
        pub total_order_items: i64,
        pub page_views: i64,
        pub sessions: i64,
        pub buy_box_percentage: f64,
        pub breakdown_json: String,
        pub updated_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod asin_row {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a004_sales_traffic_asin")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub account_id: String,
        pub asp_id: String,
        pub marketplace_id: String,
        pub date: Date,
        pub parent_asin: Option<String>,
        pub child_asin: String,
        pub sku: Option<String>,
        pub ordered_product_sales: f64,
        pub units_ordered: i64,
        pub total_order_items: i64,
        pub page_views: i64,
        pub sessions: i64,
        pub buy_box_percentage: f64,
        pub updated_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Upsert by `(account_id, asp_id, marketplace_id, date)`
pub async fn upsert_summary(db: &DatabaseConnection, row: &SalesTrafficSummary) -> Result<bool> {
    let existing = summary_row::Entity::find()
        .filter(summary_row::Column::AccountId.eq(&row.account_id))
        .filter(summary_row::Column::AspId.eq(&row.asp_id))
        .filter(summary_row::Column::MarketplaceId.eq(&row.marketplace_id))
        .filter(summary_row::Column::Date.eq(row.date))
        .one(db)
        .await?;

    let (id, is_new) = match existing {
        Some(m) => (m.id, false),
        None => (Uuid::new_v4().to_string(), true),
    };
    let active = summary_row::ActiveModel {
        id: Set(id),
        account_id: Set(row.account_id.clone()),
        asp_id: Set(row.asp_id.clone()),
        marketplace_id: Set(row.marketplace_id.clone()),
        date: Set(row.date),
        ordered_product_sales: Set(row.ordered_product_sales),
        currency: Set(row.currency.clone()),
        units_ordered: Set(row.units_ordered),
        total_order_items: Set(row.total_order_items),
        page_views: Set(row.page_views),
        sessions: Set(row.sessions),
        buy_box_percentage: Set(row.buy_box_percentage),
        breakdown_json: Set(row.breakdown_json.to_string()),
        updated_at: Set(Utc::now()),
    };
    if is_new {
        active.insert(db).await?;
    } else {
        active.update(db).await?;
    }
    Ok(is_new)
}

/// Upsert by `(account_id, asp_id, marketplace_id, child_asin, date)`
pub async fn upsert_asin(db: &DatabaseConnection, row: &SalesTrafficAsin) -> Result<bool> {
    let existing = asin_row::Entity::find()
        .filter(asin_row::Column::AccountId.eq(&row.account_id))
        .filter(asin_row::Column::AspId.eq(&row.asp_id))
        .filter(asin_row::Column::MarketplaceId.eq(&row.marketplace_id))
        .filter(asin_row::Column::ChildAsin.eq(&row.child_asin))
        .filter(asin_row::Column::Date.eq(row.date))
        .one(db)
        .await?;

    let (id, is_new) = match existing {
        Some(m) => (m.id, false),
        None => (Uuid::new_v4().to_string(), true),
    };
    let active = asin_row::ActiveModel {
        id: Set(id),
        account_id: Set(row.account_id.clone()),
        asp_id: Set(row.asp_id.clone()),
        marketplace_id: Set(row.marketplace_id.clone()),
        date: Set(row.date),
        parent_asin: Set(row.parent_asin.clone()),
        child_asin: Set(row.child_asin.clone()),
        sku: Set(row.sku.clone()),
        ordered_product_sales: Set(row.ordered_product_sales),
        units_ordered: Set(row.units_ordered),
        total_order_items: Set(row.total_order_items),
        page_views: Set(row.page_views),
        sessions: Set(row.sessions),
        buy_box_percentage: Set(row.buy_box_percentage),
        updated_at: Set(Utc::now()),
    };
    if is_new {
        active.insert(db).await?;
    } else {
        active.update(db).await?;
    }
    Ok(is_new)
}

pub async fn count_asin_rows(db: &DatabaseConnection, account_id: &str) -> Result<u64> {
    Ok(asin_row::Entity::find()
        .filter(asin_row::Column::AccountId.eq(account_id))
        .count(db)
        .await?)
}

pub async fn count_summary_rows(db: &DatabaseConnection, account_id: &str) -> Result<u64> {
    Ok(summary_row::Entity::find()
        .filter(summary_row::Column::AccountId.eq(account_id))
        .count(db)
        .await?)
}
