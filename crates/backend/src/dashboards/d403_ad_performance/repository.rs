use anyhow::Result;
use sea_orm::{DatabaseConnection, FromQueryResult};

use crate::shared::analytics::aggregator::{
    sponsored_ad_predicates, MetricFilters, Scope, SPONSORED_ADS_FROM,
};
use crate::shared::analytics::date_range::DateRange;

/// Sponsored ads totals for one ad product line
#[derive(Debug, Clone, FromQueryResult)]
pub struct AdProductAggregation {
    pub ad_product: String,
    pub spend: f64,
    pub sales: f64,
    pub impressions: i64,
    pub clicks: i64,
}

pub async fn get_totals_by_ad_product(
    db: &DatabaseConnection,
    scope: &Scope,
    range: &DateRange,
    filters: &MetricFilters,
) -> Result<Vec<AdProductAggregation>> {
    let select = format!(
        r#"
        SELECT
            sa.ad_product                                     AS ad_product,
            CAST(COALESCE(SUM(sa.cost), 0) AS REAL)           AS spend,
            CAST(COALESCE(SUM(sa.sales), 0) AS REAL)          AS sales,
            CAST(COALESCE(SUM(sa.impressions), 0) AS INTEGER) AS impressions,
            CAST(COALESCE(SUM(sa.clicks), 0) AS INTEGER)      AS clicks
        {}"#,
        SPONSORED_ADS_FROM
    );
    let stmt = sponsored_ad_predicates(scope, range, filters).statement(
        &select,
        "GROUP BY sa.ad_product ORDER BY spend DESC, sa.ad_product",
    );

    Ok(AdProductAggregation::find_by_statement(stmt).all(db).await?)
}
