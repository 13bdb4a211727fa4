use anyhow::Result;
use contracts::domain::a003_order::aggregate::{Order, OrderItem};
use contracts::domain::a008_amazon_report::aggregate::AmazonReport;
use contracts::usecases::u501_import_from_sp_api::response::IngestSummary;
use sea_orm::DatabaseConnection;

use super::{parse_report_datetime, read_flat_file, FlatRow};
use crate::domain::a003_order;

/// Groups the all-orders flat file (one row per order line) into orders
pub fn parse(report: &AmazonReport, bytes: &[u8]) -> Result<(Vec<(Order, Vec<OrderItem>)>, i64)> {
    let mut orders: Vec<(Order, Vec<OrderItem>)> = Vec::new();
    let mut skipped = 0;

    for row in read_flat_file(bytes)? {
        let Some(order_id) = row.opt("amazon-order-id") else {
            skipped += 1;
            continue;
        };
        let Some(purchase_date) = row.get("purchase-date").and_then(parse_report_datetime) else {
            tracing::warn!("Order {} has no usable purchase-date", order_id);
            skipped += 1;
            continue;
        };

        let item = order_item(report, &order_id, &row);
        match orders
            .iter_mut()
            .find(|(o, _)| o.amazon_order_id == order_id)
        {
            Some((order, items)) => {
                order.order_total += item.item_price;
                items.push(item);
            }
            None => {
                let order = Order {
                    account_id: report.account_id.clone(),
                    selling_partner_id: report.asp_id.clone(),
                    marketplace_id: report.marketplace_id.clone(),
                    amazon_order_id: order_id,
                    order_status: row.text("order-status"),
                    order_total: item.item_price,
                    currency: row.opt("currency"),
                    sales_channel: row.opt("sales-channel"),
                    fulfillment_channel: row.opt("fulfillment-channel"),
                    ship_city: row.opt("ship-city"),
                    ship_state: row.opt("ship-state"),
                    ship_postal_code: row.opt("ship-postal-code"),
                    ship_country: row.opt("ship-country"),
                    purchase_date: purchase_date.to_rfc3339(),
                    last_updated_date: row
                        .get("last-updated-date")
                        .and_then(parse_report_datetime)
                        .map(|d| d.to_rfc3339()),
                };
                orders.push((order, vec![item]));
            }
        }
    }
    Ok((orders, skipped))
}

fn order_item(report: &AmazonReport, order_id: &str, row: &FlatRow) -> OrderItem {
    OrderItem {
        account_id: report.account_id.clone(),
        selling_partner_id: report.asp_id.clone(),
        amazon_order_id: order_id.to_string(),
        seller_sku: row.text("sku"),
        asin: row.opt("asin"),
        quantity_ordered: row.count("quantity"),
        item_price: row.amount("item-price"),
        item_tax: row.amount("item-tax"),
        promotion_discount: row.amount("item-promotion-discount"),
        currency: row.opt("currency"),
    }
}

pub async fn process(
    db: &DatabaseConnection,
    report: &AmazonReport,
    bytes: &[u8],
) -> Result<IngestSummary> {
    let (orders, mut skipped) = parse(report, bytes)?;
    let mut ingested = 0;
    for (order, items) in &orders {
        match a003_order::service::store(db, order, items).await {
            Ok(_) => ingested += 1,
            Err(e) => {
                tracing::warn!("Skipping order {}: {}", order.amazon_order_id, e);
                skipped += 1;
            }
        }
    }
    Ok(IngestSummary {
        rows_ingested: ingested,
        rows_skipped: skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a003_order::repository;
    use crate::shared::data::db::test_support::memory_db;
    use crate::usecases::u501_import_from_sp_api::processors::test_report;
    use contracts::enums::report_type::ReportType;

    const FILE: &str = "amazon-order-id\tpurchase-date\tlast-updated-date\torder-status\tfulfillment-channel\tsales-channel\tsku\tasin\tquantity\tcurrency\titem-price\titem-tax\titem-promotion-discount\tship-city\tship-state\tship-postal-code\tship-country
111-1\t2023-06-10T10:00:00+00:00\t2023-06-11T10:00:00+00:00\tShipped\tAmazon\tAmazon.com\tSKU-1\tB001\t2\tUSD\t40.00\t3.20\t0\tSeattle\tWA\t98101\tUS
111-1\t2023-06-10T10:00:00+00:00\t2023-06-11T10:00:00+00:00\tShipped\tAmazon\tAmazon.com\tSKU-2\tB002\t1\tUSD\t15.50\t1.24\t-2.00\tSeattle\tWA\t98101\tUS
111-2\tnot-a-date\t\tPending\tAmazon\tAmazon.com\tSKU-1\tB001\t1\tUSD\t20.00\t0\t0\t\t\t\t
";

    #[test]
    fn test_lines_grouped_into_orders() {
        let report = test_report(ReportType::AllOrders);
        let (orders, skipped) = parse(&report, FILE.as_bytes()).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(skipped, 1);

        let (order, items) = &orders[0];
        assert_eq!(order.order_total, 55.5);
        assert_eq!(order.ship_city.as_deref(), Some("Seattle"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].promotion_discount, -2.0);
    }

    #[tokio::test]
    async fn test_reingest_keeps_one_row_per_key() {
        let db = memory_db().await;
        let report = test_report(ReportType::AllOrders);
        process(&db, &report, FILE.as_bytes()).await.unwrap();
        let summary = process(&db, &report, FILE.as_bytes()).await.unwrap();

        assert_eq!(summary.rows_ingested, 1);
        assert_eq!(repository::count_orders(&db, "acc-1").await.unwrap(), 1);
        assert_eq!(repository::count_items(&db, "acc-1").await.unwrap(), 2);
    }
}
