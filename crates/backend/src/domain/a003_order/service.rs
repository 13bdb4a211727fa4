use contracts::domain::a003_order::aggregate::{Order, OrderItem, OrderListItem};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;

use super::repository;
use crate::shared::analytics::date_range::DateRange;
use crate::shared::error::ApiError;

const MAX_PAGE: u64 = 500;

/// Validates and upserts one order with its lines. Returns true for a new order.
pub async fn store(
    db: &DatabaseConnection,
    order: &Order,
    items: &[OrderItem],
) -> anyhow::Result<bool> {
    order.validate().map_err(anyhow::Error::msg)?;
    let is_new = repository::upsert_order(db, order).await?;
    for item in items {
        match item.validate() {
            Ok(()) => {
                repository::upsert_item(db, item).await?;
            }
            Err(e) => tracing::warn!("Skipping line of order {}: {}", order.amazon_order_id, e),
        }
    }
    Ok(is_new)
}

pub async fn list_with_items(
    db: &DatabaseConnection,
    account_id: &str,
    asp_id: &str,
    range: Option<&DateRange>,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<Vec<OrderListItem>, ApiError> {
    let limit = limit.unwrap_or(100).clamp(1, MAX_PAGE);
    let orders = repository::list_orders(
        db,
        account_id,
        asp_id,
        range,
        limit,
        offset.unwrap_or(0),
    )
    .await?;

    let ids: Vec<String> = orders.iter().map(|o| o.amazon_order_id.clone()).collect();
    let mut items_by_order: HashMap<String, Vec<OrderItem>> = HashMap::new();
    for item in repository::list_items(db, asp_id, &ids).await? {
        items_by_order
            .entry(item.amazon_order_id.clone())
            .or_default()
            .push(item);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = items_by_order
                .remove(&order.amazon_order_id)
                .unwrap_or_default();
            OrderListItem { order, items }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::analytics::aggregator::fixtures::{item, order, ACCOUNT, SELLER, US};
    use crate::shared::data::db::test_support::memory_db;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_reingest_keeps_one_row_per_key() {
        let db = memory_db().await;
        let o = order("111-1", "2023-06-17", "Pending", US);
        let lines = vec![item("111-1", "SKU-K", "B0KITCHEN", 1, 20.0)];

        assert!(store(&db, &o, &lines).await.unwrap());

        let mut shipped = o.clone();
        shipped.order_status = "Shipped".into();
        assert!(!store(&db, &shipped, &lines).await.unwrap());

        assert_eq!(repository::count_orders(&db, ACCOUNT).await.unwrap(), 1);
        assert_eq!(repository::count_items(&db, ACCOUNT).await.unwrap(), 1);

        let listed = list_with_items(&db, ACCOUNT, SELLER, None, None, None)
            .await
            .unwrap();
        assert_eq!(listed[0].order.order_status, "Shipped");
    }

    #[tokio::test]
    async fn test_multi_line_orders_keep_every_sku() {
        let db = memory_db().await;
        let o = order("111-9", "2023-06-17", "Shipped", US);
        let lines = vec![
            item("111-9", "SKU-A", "B0A", 1, 10.0),
            item("111-9", "SKU-B", "B0B", 2, 30.0),
        ];
        store(&db, &o, &lines).await.unwrap();
        assert_eq!(repository::count_items(&db, ACCOUNT).await.unwrap(), 2);

        let june = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 6, 17).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 17).unwrap(),
        );
        let listed = list_with_items(&db, ACCOUNT, SELLER, Some(&june), Some(10), None)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].items.len(), 2);
    }
}
