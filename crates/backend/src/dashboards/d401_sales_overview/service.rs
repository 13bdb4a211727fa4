use contracts::dashboards::d401_sales_overview::SalesOverviewResponse;
use contracts::shared::analytics::DashboardQuery;
use sea_orm::DatabaseConnection;

use crate::dashboards::ComparisonWindows;
use crate::shared::analytics::profit_loss::{average_order_value, conversion_rate};
use crate::shared::error::ApiError;

/// Headline sales cards for the selected window against the prior one
pub async fn get_sales_overview(
    db: &DatabaseConnection,
    account_id: &str,
    query: &DashboardQuery,
) -> Result<SalesOverviewResponse, ApiError> {
    let windows = ComparisonWindows::resolve(account_id, query)?;
    let sums = windows.sums(db).await?;

    Ok(SalesOverviewResponse {
        periods: windows.periods(),
        gross_sales: sums.revenue(|s| s.gross_sales),
        units_sold: sums.revenue(|s| s.units_sold as f64),
        order_count: sums.revenue(|s| s.order_count as f64),
        average_order_value: sums.revenue(average_order_value),
        refund: sums.expense(|s| s.refund),
        page_views: sums.revenue(|s| s.page_views as f64),
        sessions: sums.revenue(|s| s.sessions as f64),
        conversion_rate: sums.revenue(conversion_rate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::test_support::june_query;
    use crate::shared::analytics::aggregator::fixtures::{seed_june, ACCOUNT};
    use crate::shared::data::db::test_support::memory_db;

    #[tokio::test]
    async fn test_sales_overview_against_empty_prior() {
        let db = memory_db().await;
        seed_june(&db).await;

        let res = get_sales_overview(&db, ACCOUNT, &june_query()).await.unwrap();

        assert_eq!(res.gross_sales.current, 100.0);
        assert_eq!(res.gross_sales.prior, 0.0);
        // zero prior passes the current value through
        assert_eq!(res.gross_sales.percentage_growth, 100.0);
        assert_eq!(res.units_sold.current, 3.0);
        assert_eq!(res.order_count.current, 2.0);
        assert_eq!(res.average_order_value.current, 50.0);
        assert_eq!(res.refund.current, -60.0);
        assert_eq!(res.conversion_rate.current, 0.0);
        assert!(res.gross_sales.previous_year.is_none());
    }

    #[tokio::test]
    async fn test_sales_overview_other_account_sees_nothing() {
        let db = memory_db().await;
        seed_june(&db).await;

        let res = get_sales_overview(&db, "acc-2", &june_query()).await.unwrap();

        assert_eq!(res.gross_sales.current, 0.0);
        assert_eq!(res.order_count.current, 0.0);
    }

    #[tokio::test]
    async fn test_sales_overview_filters_by_category() {
        let db = memory_db().await;
        seed_june(&db).await;

        let query = DashboardQuery {
            category: Some("Garden".into()),
            compare_previous_year: Some(true),
            ..june_query()
        };
        let res = get_sales_overview(&db, ACCOUNT, &query).await.unwrap();

        assert_eq!(res.gross_sales.current, 60.0);
        assert_eq!(res.units_sold.current, 1.0);
        assert_eq!(
            res.gross_sales.previous_year.map(|py| py.value),
            Some(0.0)
        );
    }

    #[tokio::test]
    async fn test_sales_overview_rejects_bad_date() {
        let db = memory_db().await;
        let query = DashboardQuery {
            to_date: Some("2023-13-01".into()),
            ..june_query()
        };
        assert!(matches!(
            get_sales_overview(&db, ACCOUNT, &query).await,
            Err(ApiError::Validation(_))
        ));
    }
}
