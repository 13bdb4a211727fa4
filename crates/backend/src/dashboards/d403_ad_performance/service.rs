use contracts::dashboards::d403_ad_performance::{AdPerformanceResponse, AdProductBreakdown};
use contracts::enums::report_type::AdProduct;
use contracts::shared::analytics::DashboardQuery;
use sea_orm::DatabaseConnection;

use super::repository;
use crate::dashboards::ComparisonWindows;
use crate::shared::analytics::profit_loss::{ratio_percent, AdRatios};
use crate::shared::error::ApiError;
use crate::shared::format::round2;

/// Sponsored ads spend and efficiency, plus the current split by ad product
pub async fn get_ad_performance(
    db: &DatabaseConnection,
    account_id: &str,
    query: &DashboardQuery,
) -> Result<AdPerformanceResponse, ApiError> {
    let windows = ComparisonWindows::resolve(account_id, query)?;
    let sums = windows.sums(db).await?;

    let by_ad_product = repository::get_totals_by_ad_product(
        db,
        &windows.scope,
        &windows.current,
        &windows.filters,
    )
    .await?
    .into_iter()
    .filter_map(|row| {
        let Some(ad_product) = AdProduct::from_code(&row.ad_product) else {
            tracing::warn!("Unknown ad product in sponsored ads: {}", row.ad_product);
            return None;
        };
        Some(AdProductBreakdown {
            ad_product,
            spend: round2(row.spend),
            sales: round2(row.sales),
            impressions: row.impressions,
            clicks: row.clicks,
            acos: ratio_percent(row.spend.abs(), row.sales),
        })
    })
    .collect();

    Ok(AdPerformanceResponse {
        periods: windows.periods(),
        ad_spend: sums.expense(|s| s.ad_spend),
        ad_sales: sums.revenue(|s| s.ad_sales),
        impressions: sums.revenue(|s| s.impressions as f64),
        clicks: sums.revenue(|s| s.clicks as f64),
        ad_orders: sums.revenue(|s| s.ad_orders as f64),
        acos: sums.revenue(|s| AdRatios::from_sums(s).acos),
        tacos: sums.revenue(|s| AdRatios::from_sums(s).tacos),
        roas: sums.revenue(|s| AdRatios::from_sums(s).roas),
        ctr: sums.revenue(|s| AdRatios::from_sums(s).ctr),
        cpc: sums.revenue(|s| AdRatios::from_sums(s).cpc),
        by_ad_product,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::dashboards::test_support::june_query;
    use crate::domain::a007_sponsored_ad;
    use crate::shared::analytics::aggregator::fixtures::{ad, seed_june, ACCOUNT};
    use crate::shared::data::db::test_support::memory_db;

    #[tokio::test]
    async fn test_ad_performance_ratios() {
        let db = memory_db().await;
        seed_june(&db).await;

        let res = get_ad_performance(&db, ACCOUNT, &june_query()).await.unwrap();

        assert_eq!(res.ad_spend.current, -5.0);
        assert_eq!(res.ad_sales.current, 40.0);
        assert_eq!(res.impressions.current, 1000.0);
        assert_eq!(res.clicks.current, 20.0);
        assert_eq!(res.ad_orders.current, 2.0);
        assert_eq!(res.acos.current, 12.5);
        // 5 / 100 gross sales
        assert_eq!(res.tacos.current, 5.0);
        assert_eq!(res.roas.current, 8.0);
        assert_eq!(res.ctr.current, 2.0);
        assert_eq!(res.cpc.current, 0.25);
    }

    #[tokio::test]
    async fn test_ad_performance_splits_by_ad_product() {
        let db = memory_db().await;
        seed_june(&db).await;
        let mut display = ad("B0GARDEN", NaiveDate::from_ymd_opt(2023, 6, 20).unwrap(), 9.0, 30.0);
        display.ad_product = AdProduct::SponsoredDisplay;
        a007_sponsored_ad::repository::upsert(&db, &display).await.unwrap();

        let res = get_ad_performance(&db, ACCOUNT, &june_query()).await.unwrap();

        assert_eq!(res.by_ad_product.len(), 2);
        assert_eq!(res.by_ad_product[0].ad_product, AdProduct::SponsoredDisplay);
        assert_eq!(res.by_ad_product[0].acos, 30.0);
        assert_eq!(res.by_ad_product[1].ad_product, AdProduct::SponsoredProducts);
        assert_eq!(res.by_ad_product[1].spend, 5.0);
        assert_eq!(res.ad_spend.current, -14.0);
    }

    #[tokio::test]
    async fn test_ad_performance_brand_filter() {
        let db = memory_db().await;
        seed_june(&db).await;
        let query = DashboardQuery {
            brand: Some("Zeta".into()),
            ..june_query()
        };

        let res = get_ad_performance(&db, ACCOUNT, &query).await.unwrap();

        assert_eq!(res.ad_spend.current, 0.0);
        assert!(res.by_ad_product.is_empty());
    }
}
