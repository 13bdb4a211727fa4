use anyhow::Result;
use chrono::Utc;
use contracts::domain::a003_order::aggregate::{Order, OrderItem};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::shared::analytics::date_range::DateRange;

pub mod order_row {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a003_order")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub account_id: String,
        pub selling_partner_id: String,
        pub marketplace_id: String,
        pub amazon_order_id: String,
        pub order_status: String,
        pub order_total: f64,
        pub currency: Option<String>,
        pub sales_channel: Option<String>,
        pub fulfillment_channel: Option<String>,
        pub ship_city: Option<String>,
        pub ship_state: Option<String>,
        pub ship_postal_code: Option<String>,
        pub ship_country: Option<String>,
        pub purchase_date: String,
        pub last_updated_date: Option<String>,
        pub created_at: chrono::DateTime<chrono::Utc>,
        pub updated_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod item_row {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a003_order_item")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub account_id: String,
        pub selling_partner_id: String,
        pub amazon_order_id: String,
        pub seller_sku: String,
        pub asin: Option<String>,
        pub quantity_ordered: i64,
        pub item_price: f64,
        pub item_tax: f64,
        pub promotion_discount: f64,
        pub currency: Option<String>,
        pub created_at: chrono::DateTime<chrono::Utc>,
        pub updated_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<order_row::Model> for Order {
    fn from(m: order_row::Model) -> Self {
        Order {
            account_id: m.account_id,
            selling_partner_id: m.selling_partner_id,
            marketplace_id: m.marketplace_id,
            amazon_order_id: m.amazon_order_id,
            order_status: m.order_status,
            order_total: m.order_total,
            currency: m.currency,
            sales_channel: m.sales_channel,
            fulfillment_channel: m.fulfillment_channel,
            ship_city: m.ship_city,
            ship_state: m.ship_state,
            ship_postal_code: m.ship_postal_code,
            ship_country: m.ship_country,
            purchase_date: m.purchase_date,
            last_updated_date: m.last_updated_date,
        }
    }
}

impl From<item_row::Model> for OrderItem {
    fn from(m: item_row::Model) -> Self {
        OrderItem {
            account_id: m.account_id,
            selling_partner_id: m.selling_partner_id,
            amazon_order_id: m.amazon_order_id,
            seller_sku: m.seller_sku,
            asin: m.asin,
            quantity_ordered: m.quantity_ordered,
            item_price: m.item_price,
            item_tax: m.item_tax,
            promotion_discount: m.promotion_discount,
            currency: m.currency,
        }
    }
}

/// Upsert by `(selling_partner_id, amazon_order_id)`. Returns true when inserted.
pub async fn upsert_order(db: &DatabaseConnection, order: &Order) -> Result<bool> {
    let existing = order_row::Entity::find()
        .filter(order_row::Column::SellingPartnerId.eq(&order.selling_partner_id))
        .filter(order_row::Column::AmazonOrderId.eq(&order.amazon_order_id))
        .one(db)
        .await?;

    let now = Utc::now();
    let (id, created_at, is_new) = match &existing {
        Some(m) => (m.id.clone(), m.created_at, false),
        None => (Uuid::new_v4().to_string(), now, true),
    };

    let active = order_row::ActiveModel {
        id: Set(id),
        account_id: Set(order.account_id.clone()),
        selling_partner_id: Set(order.selling_partner_id.clone()),
        marketplace_id: Set(order.marketplace_id.clone()),
        amazon_order_id: Set(order.amazon_order_id.clone()),
        order_status: Set(order.order_status.clone()),
        order_total: Set(order.order_total),
        currency: Set(order.currency.clone()),
        sales_channel: Set(order.sales_channel.clone()),
        fulfillment_channel: Set(order.fulfillment_channel.clone()),
        ship_city: Set(order.ship_city.clone()),
        ship_state: Set(order.ship_state.clone()),
        ship_postal_code: Set(order.ship_postal_code.clone()),
        ship_country: Set(order.ship_country.clone()),
        purchase_date: Set(order.purchase_date.clone()),
        last_updated_date: Set(order.last_updated_date.clone()),
        created_at: Set(created_at),
        updated_at: Set(now),
    };
    if is_new {
        active.insert(db).await?;
    } else {
        active.update(db).await?;
    }
    Ok(is_new)
}

/// Upsert by `(selling_partner_id, amazon_order_id, seller_sku)`. Returns true when inserted.
pub async fn upsert_item(db: &DatabaseConnection, item: &OrderItem) -> Result<bool> {
    let existing = item_row::Entity::find()
        .filter(item_row::Column::SellingPartnerId.eq(&item.selling_partner_id))
        .filter(item_row::Column::AmazonOrderId.eq(&item.amazon_order_id))
        .filter(item_row::Column::SellerSku.eq(&item.seller_sku))
        .one(db)
        .await?;

    let now = Utc::now();
    let (id, created_at, is_new) = match &existing {
        Some(m) => (m.id.clone(), m.created_at, false),
        None => (Uuid::new_v4().to_string(), now, true),
    };

    let active = item_row::ActiveModel {
        id: Set(id),
        account_id: Set(item.account_id.clone()),
        selling_partner_id: Set(item.selling_partner_id.clone()),
        amazon_order_id: Set(item.amazon_order_id.clone()),
        seller_sku: Set(item.seller_sku.clone()),
        asin: Set(item.asin.clone()),
        quantity_ordered: Set(item.quantity_ordered),
        item_price: Set(item.item_price),
        item_tax: Set(item.item_tax),
        promotion_discount: Set(item.promotion_discount),
        currency: Set(item.currency.clone()),
        created_at: Set(created_at),
        updated_at: Set(now),
    };
    if is_new {
        active.insert(db).await?;
    } else {
        active.update(db).await?;
    }
    Ok(is_new)
}

/// Orders of one seller, newest first
pub async fn list_orders(
    db: &DatabaseConnection,
    account_id: &str,
    selling_partner_id: &str,
    range: Option<&DateRange>,
    limit: u64,
    offset: u64,
) -> Result<Vec<Order>> {
    let mut query = order_row::Entity::find()
        .filter(order_row::Column::AccountId.eq(account_id))
        .filter(order_row::Column::SellingPartnerId.eq(selling_partner_id));

    if let Some(range) = range {
        // purchase_date is RFC 3339, so the day bounds compare as text
        query = query
            .filter(order_row::Column::PurchaseDate.gte(range.start_str()))
            .filter(order_row::Column::PurchaseDate.lt(format!("{}~", range.end_str())));
    }

    let models = query
        .order_by_desc(order_row::Column::PurchaseDate)
        .limit(limit)
        .offset(offset)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Into::into).collect())
}

pub async fn list_items(
    db: &DatabaseConnection,
    selling_partner_id: &str,
    amazon_order_ids: &[String],
) -> Result<Vec<OrderItem>> {
    if amazon_order_ids.is_empty() {
        return Ok(Vec::new());
    }
    let models = item_row::Entity::find()
        .filter(item_row::Column::SellingPartnerId.eq(selling_partner_id))
        .filter(item_row::Column::AmazonOrderId.is_in(amazon_order_ids.iter().cloned()))
        .all(db)
        .await?;
    Ok(models.into_iter().map(Into::into).collect())
}

pub async fn count_items(db: &DatabaseConnection, account_id: &str) -> Result<u64> {
    Ok(item_row::Entity::find()
        .filter(item_row::Column::AccountId.eq(account_id))
        .count(db)
        .await?)
}

pub async fn count_orders(db: &DatabaseConnection, account_id: &str) -> Result<u64> {
    Ok(order_row::Entity::find()
        .filter(order_row::Column::AccountId.eq(account_id))
        .count(db)
        .await?)
}
