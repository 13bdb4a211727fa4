use anyhow::{Context, Result};
use contracts::domain::a007_sponsored_ad::aggregate::SponsoredAd;
use contracts::domain::a008_amazon_report::aggregate::AmazonReport;
use contracts::usecases::u501_import_from_sp_api::response::IngestSummary;
use sea_orm::DatabaseConnection;
use serde_json::{Map, Value};

use crate::domain::a007_sponsored_ad;
use crate::usecases::u501_import_from_sp_api::processors::parse_report_date;

/// Column aliases across ad products: SP uses 7-day attribution columns, SB
/// and SD use the plain names
const SALES: &[&str] = &["sales7d", "sales", "attributedSales14d"];
const ORDERS: &[&str] = &["purchases7d", "purchases", "attributedConversions14d"];
const UNITS: &[&str] = &["unitsSoldClicks7d", "unitsSold", "attributedUnitsOrdered14d"];
const ASIN: &[&str] = &["advertisedAsin", "promotedAsin", "asin"];

fn text(row: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| match row.get(*k) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn number(row: &Map<String, Value>, keys: &[&str]) -> f64 {
    keys.iter()
        .find_map(|k| match row.get(*k) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .unwrap_or(0.0)
}

fn count(row: &Map<String, Value>, keys: &[&str]) -> i64 {
    number(row, keys).round() as i64
}

/// Parses a v3 GZIP_JSON report document (a JSON array of daily rows)
pub fn parse(report: &AmazonReport, bytes: &[u8]) -> Result<(Vec<SponsoredAd>, i64)> {
    let ad_product = report
        .report_type
        .ad_product()
        .with_context(|| format!("{} is not an Ads report", report.report_type))?;
    let rows: Vec<Map<String, Value>> =
        serde_json::from_slice(bytes).context("Ads report document is not a JSON array")?;

    let mut ads = Vec::new();
    let mut skipped = 0;
    for row in rows {
        let Some(payload_date) = parse_report_date(&text(&row, &["date"])) else {
            skipped += 1;
            continue;
        };
        let campaign_name = text(&row, &["campaignName"]);
        ads.push(SponsoredAd {
            account_id: report.account_id.clone(),
            asp_id: report.asp_id.clone(),
            ad_product,
            payload_date,
            campaign_id: text(&row, &["campaignId"]),
            campaign_name: (!campaign_name.is_empty()).then_some(campaign_name),
            ad_group_id: text(&row, &["adGroupId"]),
            keyword_id: text(&row, &["keywordId"]),
            asin: text(&row, ASIN),
            impressions: count(&row, &["impressions"]),
            clicks: count(&row, &["clicks"]),
            cost: number(&row, &["cost"]),
            sales: number(&row, SALES),
            orders: count(&row, ORDERS),
            units: count(&row, UNITS),
        });
    }
    Ok((ads, skipped))
}

pub async fn process(
    db: &DatabaseConnection,
    report: &AmazonReport,
    bytes: &[u8],
) -> Result<IngestSummary> {
    let (ads, skipped) = parse(report, bytes)?;
    let mut summary = IngestSummary {
        rows_ingested: 0,
        rows_skipped: skipped,
    };
    for ad in &ads {
        match a007_sponsored_ad::service::store(db, ad).await? {
            Some(_) => summary.rows_ingested += 1,
            None => summary.rows_skipped += 1,
        }
    }
    Ok(summary)
}
