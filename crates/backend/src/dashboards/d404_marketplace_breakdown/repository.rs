use anyhow::Result;
use sea_orm::{DatabaseConnection, FromQueryResult};

use crate::shared::analytics::aggregator::{
    order_item_predicates, MetricFilters, Scope, ORDER_ITEMS_FROM,
};
use crate::shared::analytics::date_range::DateRange;

/// Order totals for one marketplace
#[derive(Debug, Clone, FromQueryResult)]
pub struct MarketplaceAggregation {
    pub marketplace_id: String,
    pub currency: Option<String>,
    pub gross_sales: f64,
    pub units_sold: i64,
    pub order_count: i64,
}

pub async fn get_sales_by_marketplace(
    db: &DatabaseConnection,
    scope: &Scope,
    range: &DateRange,
    filters: &MetricFilters,
) -> Result<Vec<MarketplaceAggregation>> {
    let select = format!(
        r#"
        SELECT
            o.marketplace_id                                       AS marketplace_id,
            MAX(o.currency)                                        AS currency,
            CAST(COALESCE(SUM(oi.item_price), 0) AS REAL)          AS gross_sales,
            CAST(COALESCE(SUM(oi.quantity_ordered), 0) AS INTEGER) AS units_sold,
            CAST(COUNT(DISTINCT oi.amazon_order_id) AS INTEGER)    AS order_count
        {}"#,
        ORDER_ITEMS_FROM
    );
    let stmt = order_item_predicates(scope, range, filters)
        .statement(&select, "GROUP BY o.marketplace_id");

    Ok(MarketplaceAggregation::find_by_statement(stmt).all(db).await?)
}
