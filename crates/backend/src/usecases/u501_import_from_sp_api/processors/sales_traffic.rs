use anyhow::{Context, Result};
use contracts::domain::a004_sales_traffic::aggregate::{SalesTrafficAsin, SalesTrafficSummary};
use contracts::domain::a008_amazon_report::aggregate::AmazonReport;
use contracts::usecases::u501_import_from_sp_api::response::IngestSummary;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use super::parse_report_date;
use crate::domain::a004_sales_traffic;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SalesTrafficDocument {
    #[serde(default)]
    sales_and_traffic_by_date: Vec<ByDate>,
    #[serde(default)]
    sales_and_traffic_by_asin: Vec<ByAsin>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByDate {
    date: String,
    #[serde(default)]
    sales_by_date: Sales,
    #[serde(default)]
    traffic_by_date: Traffic,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByAsin {
    #[serde(default)]
    parent_asin: Option<String>,
    #[serde(default)]
    child_asin: Option<String>,
    #[serde(default)]
    sku: Option<String>,
    #[serde(default)]
    sales_by_asin: Sales,
    #[serde(default)]
    traffic_by_asin: Traffic,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Sales {
    #[serde(default)]
    ordered_product_sales: Option<MoneyAmount>,
    #[serde(default)]
    units_ordered: i64,
    #[serde(default)]
    total_order_items: i64,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Traffic {
    #[serde(default)]
    page_views: i64,
    #[serde(default)]
    sessions: i64,
    #[serde(default)]
    buy_box_percentage: f64,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoneyAmount {
    #[serde(default)]
    amount: f64,
    #[serde(default)]
    currency_code: Option<String>,
}

/// By-date entries become daily summaries; by-ASIN entries cover the whole
/// report window and are dated with its first day.
pub fn parse(
    report: &AmazonReport,
    bytes: &[u8],
) -> Result<(Vec<SalesTrafficSummary>, Vec<SalesTrafficAsin>)> {
    let document: SalesTrafficDocument =
        serde_json::from_slice(bytes).context("sales & traffic document is not valid JSON")?;

    let mut summaries = Vec::new();
    for day in document.sales_and_traffic_by_date {
        let Some(date) = parse_report_date(&day.date) else {
            tracing::warn!("Sales & traffic entry with bad date {}", day.date);
            continue;
        };
        let breakdown = serde_json::json!({
            "salesByDate": &day.sales_by_date,
            "trafficByDate": &day.traffic_by_date,
        });
        let sales = day.sales_by_date.ordered_product_sales.unwrap_or_default();
        summaries.push(SalesTrafficSummary {
            account_id: report.account_id.clone(),
            asp_id: report.asp_id.clone(),
            marketplace_id: report.marketplace_id.clone(),
            date,
            ordered_product_sales: sales.amount,
            currency: sales.currency_code,
            units_ordered: day.sales_by_date.units_ordered,
            total_order_items: day.sales_by_date.total_order_items,
            page_views: day.traffic_by_date.page_views,
            sessions: day.traffic_by_date.sessions,
            buy_box_percentage: day.traffic_by_date.buy_box_percentage,
            breakdown_json: breakdown,
        });
    }

    let asins = document
        .sales_and_traffic_by_asin
        .into_iter()
        .map(|entry| SalesTrafficAsin {
            account_id: report.account_id.clone(),
            asp_id: report.asp_id.clone(),
            marketplace_id: report.marketplace_id.clone(),
            date: report.data_start_date,
            parent_asin: entry.parent_asin,
            child_asin: entry.child_asin.unwrap_or_default(),
            sku: entry.sku,
            ordered_product_sales: entry
                .sales_by_asin
                .ordered_product_sales
                .map(|m| m.amount)
                .unwrap_or(0.0),
            units_ordered: entry.sales_by_asin.units_ordered,
            total_order_items: entry.sales_by_asin.total_order_items,
            page_views: entry.traffic_by_asin.page_views,
            sessions: entry.traffic_by_asin.sessions,
            buy_box_percentage: entry.traffic_by_asin.buy_box_percentage,
        })
        .collect();

    Ok((summaries, asins))
}

pub async fn process(
    db: &DatabaseConnection,
    report: &AmazonReport,
    bytes: &[u8],
) -> Result<IngestSummary> {
    let (summaries, asins) = parse(report, bytes)?;
    let mut summary = IngestSummary {
        rows_ingested: 0,
        rows_skipped: 0,
    };
    for row in &summaries {
        a004_sales_traffic::service::store_summary(db, row).await?;
        summary.rows_ingested += 1;
    }
    for row in &asins {
        match a004_sales_traffic::service::store_asin(db, row).await? {
            Some(_) => summary.rows_ingested += 1,
            None => summary.rows_skipped += 1,
        }
    }
    Ok(summary)
}
