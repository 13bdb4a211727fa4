use contracts::dashboards::d404_marketplace_breakdown::{
    MarketplaceBreakdownResponse, MarketplaceRow,
};
use contracts::enums::marketplace_type::MarketplaceType;
use contracts::shared::analytics::{ComparedMetric, DashboardQuery};
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;

use super::repository::{self, MarketplaceAggregation};
use crate::dashboards::ComparisonWindows;
use crate::shared::analytics::growth::revenue;
use crate::shared::analytics::profit_loss::ratio_percent;
use crate::shared::error::ApiError;

/// One marketplace's rows across the compared windows
#[derive(Default)]
struct MarketplaceWindows {
    currency: Option<String>,
    current: Option<MarketplaceAggregation>,
    prior: Option<MarketplaceAggregation>,
    previous_year: Option<MarketplaceAggregation>,
}

impl MarketplaceWindows {
    fn compare<F>(&self, with_previous_year: bool, f: F) -> ComparedMetric
    where
        F: Fn(&MarketplaceAggregation) -> f64,
    {
        let value = |row: &Option<MarketplaceAggregation>| row.as_ref().map(&f).unwrap_or(0.0);
        revenue(
            value(&self.current),
            value(&self.prior),
            with_previous_year.then(|| value(&self.previous_year)),
        )
    }
}

fn gross_total(rows: &[MarketplaceAggregation]) -> f64 {
    rows.iter().map(|r| r.gross_sales).sum()
}

/// Entry for the row's marketplace; the first window that reports a currency wins
fn slot<'a>(
    map: &'a mut BTreeMap<String, MarketplaceWindows>,
    row: &MarketplaceAggregation,
) -> &'a mut MarketplaceWindows {
    let entry = map.entry(row.marketplace_id.clone()).or_default();
    if entry.currency.is_none() {
        entry.currency = row.currency.clone();
    }
    entry
}

/// Gross sales per marketplace, sorted by current sales, largest first
pub async fn get_marketplace_breakdown(
    db: &DatabaseConnection,
    account_id: &str,
    query: &DashboardQuery,
) -> Result<MarketplaceBreakdownResponse, ApiError> {
    let windows = ComparisonWindows::resolve(account_id, query)?;
    let scope = &windows.scope;
    let filters = &windows.filters;

    let current =
        repository::get_sales_by_marketplace(db, scope, &windows.current, filters).await?;
    let prior = repository::get_sales_by_marketplace(db, scope, &windows.prior, filters).await?;
    let previous_year = match &windows.previous_year {
        Some(range) => Some(repository::get_sales_by_marketplace(db, scope, range, filters).await?),
        None => None,
    };

    let total_current = gross_total(&current);
    let total = revenue(
        total_current,
        gross_total(&prior),
        previous_year.as_deref().map(gross_total),
    );

    let mut by_marketplace: BTreeMap<String, MarketplaceWindows> = BTreeMap::new();
    for row in current {
        let entry = slot(&mut by_marketplace, &row);
        entry.current = Some(row);
    }
    for row in prior {
        let entry = slot(&mut by_marketplace, &row);
        entry.prior = Some(row);
    }
    for row in previous_year.into_iter().flatten() {
        let entry = slot(&mut by_marketplace, &row);
        entry.previous_year = Some(row);
    }

    let with_previous_year = windows.previous_year.is_some();
    let mut rows: Vec<MarketplaceRow> = by_marketplace
        .iter()
        .map(|(marketplace_id, w)| {
            let known = MarketplaceType::from_code(marketplace_id);
            let current_sales = w.current.as_ref().map(|r| r.gross_sales).unwrap_or(0.0);
            MarketplaceRow {
                marketplace_id: marketplace_id.clone(),
                marketplace_name: known
                    .map(|m| m.display_name().to_string())
                    .unwrap_or_else(|| marketplace_id.clone()),
                currency: w
                    .currency
                    .clone()
                    .or_else(|| known.map(|m| m.currency().to_string())),
                gross_sales: w.compare(with_previous_year, |r| r.gross_sales),
                units_sold: w.compare(with_previous_year, |r| r.units_sold as f64),
                order_count: w.compare(with_previous_year, |r| r.order_count as f64),
                share_percent: ratio_percent(current_sales, total_current),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.gross_sales
            .current
            .total_cmp(&a.gross_sales.current)
            .then_with(|| a.marketplace_id.cmp(&b.marketplace_id))
    });

    Ok(MarketplaceBreakdownResponse {
        periods: windows.periods(),
        total,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::test_support::june_query;
    use crate::domain::a003_order;
    use crate::shared::analytics::aggregator::fixtures::{item, order, seed_june, ACCOUNT};
    use crate::shared::data::db::test_support::memory_db;

    const UK: &str = "A1F83G8C2ARO7P";

    async fn seed_uk(db: &DatabaseConnection) {
        let mut uk_order = order("204-1", "2023-06-19", "Shipped", UK);
        uk_order.currency = Some("GBP".into());
        a003_order::repository::upsert_order(db, &uk_order).await.unwrap();
        a003_order::repository::upsert_item(db, &item("204-1", "SKU-K", "B0KITCHEN", 1, 300.0))
            .await
            .unwrap();
        // prior window only
        a003_order::repository::upsert_order(db, &order("204-2", "2023-06-12", "Shipped", UK))
            .await
            .unwrap();
        a003_order::repository::upsert_item(db, &item("204-2", "SKU-K", "B0KITCHEN", 1, 150.0))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_breakdown_sorted_by_sales_with_share() {
        let db = memory_db().await;
        seed_june(&db).await;
        seed_uk(&db).await;

        let res = get_marketplace_breakdown(&db, ACCOUNT, &june_query())
            .await
            .unwrap();

        assert_eq!(res.total.current, 400.0);
        assert_eq!(res.total.prior, 150.0);
        assert_eq!(res.rows.len(), 2);

        let uk = &res.rows[0];
        assert_eq!(uk.marketplace_id, UK);
        assert_eq!(uk.marketplace_name, "Amazon.co.uk");
        assert_eq!(uk.currency.as_deref(), Some("GBP"));
        assert_eq!(uk.gross_sales.current, 300.0);
        assert_eq!(uk.gross_sales.prior, 150.0);
        assert_eq!(uk.gross_sales.percentage_growth, 100.0);
        assert_eq!(uk.share_percent, 75.0);

        let us = &res.rows[1];
        assert_eq!(us.marketplace_name, "Amazon.com");
        assert_eq!(us.order_count.current, 2.0);
        assert_eq!(us.share_percent, 25.0);
    }

    #[tokio::test]
    async fn test_breakdown_marketplace_filter() {
        let db = memory_db().await;
        seed_june(&db).await;
        seed_uk(&db).await;
        let query = DashboardQuery {
            marketplace_id: Some(UK.into()),
            ..june_query()
        };

        let res = get_marketplace_breakdown(&db, ACCOUNT, &query).await.unwrap();

        assert_eq!(res.rows.len(), 1);
        assert_eq!(res.rows[0].share_percent, 100.0);
    }

    #[tokio::test]
    async fn test_breakdown_keeps_marketplace_seen_only_last_year() {
        let db = memory_db().await;
        seed_june(&db).await;
        let mut last_year = order("204-9", "2022-06-18", "Shipped", UK);
        last_year.currency = Some("GBP".into());
        a003_order::repository::upsert_order(&db, &last_year).await.unwrap();
        a003_order::repository::upsert_item(&db, &item("204-9", "SKU-K", "B0KITCHEN", 1, 80.0))
            .await
            .unwrap();
        let query = DashboardQuery {
            compare_previous_year: Some(true),
            ..june_query()
        };

        let res = get_marketplace_breakdown(&db, ACCOUNT, &query).await.unwrap();

        assert_eq!(res.rows.len(), 2);
        let uk = res.rows.iter().find(|r| r.marketplace_id == UK).unwrap();
        assert_eq!(uk.gross_sales.current, 0.0);
        assert_eq!(uk.currency.as_deref(), Some("GBP"));
        assert_eq!(
            uk.gross_sales.previous_year.as_ref().map(|py| py.value),
            Some(80.0)
        );
        assert_eq!(res.total.previous_year.map(|py| py.value), Some(80.0));
    }

    #[tokio::test]
    async fn test_breakdown_empty() {
        let db = memory_db().await;

        let res = get_marketplace_breakdown(&db, ACCOUNT, &june_query())
            .await
            .unwrap();

        assert!(res.rows.is_empty());
        assert_eq!(res.total.current, 0.0);
    }
}
