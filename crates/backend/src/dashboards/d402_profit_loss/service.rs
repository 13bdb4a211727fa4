use contracts::dashboards::d402_profit_loss::ProfitLossResponse;
use contracts::shared::analytics::DashboardQuery;
use sea_orm::DatabaseConnection;

use crate::dashboards::ComparisonWindows;
use crate::shared::analytics::profit_loss::ProfitLoss;
use crate::shared::error::ApiError;

/// Profit and loss statement; expense lines come back negative
pub async fn get_profit_loss(
    db: &DatabaseConnection,
    account_id: &str,
    query: &DashboardQuery,
) -> Result<ProfitLossResponse, ApiError> {
    let windows = ComparisonWindows::resolve(account_id, query)?;
    let sums = windows.sums(db).await?;

    tracing::debug!(
        "P&L for {}/{}: {} .. {}",
        account_id,
        windows.scope.asp_id,
        windows.current.start_str(),
        windows.current.end_str()
    );

    Ok(ProfitLossResponse {
        periods: windows.periods(),
        gross_sales: sums.revenue(|s| s.gross_sales),
        refund: sums.expense(|s| s.refund),
        net_sales: sums.revenue(|s| ProfitLoss::from_sums(s).net_sales),
        market_place_fee: sums.expense(|s| s.market_place_fee),
        other_fee: sums.expense(|s| s.other_fee),
        total_cogs: sums.expense(|s| s.total_cogs),
        ad_spend: sums.expense(|s| s.ad_spend),
        reimbursement: sums.revenue(|s| s.reimbursement),
        net_profit: sums.revenue(|s| ProfitLoss::from_sums(s).net_profit),
        margin: sums.revenue(|s| ProfitLoss::from_sums(s).margin),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a006_financial_event::aggregate::{FinancialEvent, FinancialEventType};

    use crate::dashboards::test_support::june_query;
    use crate::domain::a006_financial_event;
    use crate::shared::analytics::aggregator::fixtures::{seed_june, ACCOUNT, SELLER};
    use crate::shared::data::db::test_support::memory_db;

    #[tokio::test]
    async fn test_profit_loss_statement() {
        let db = memory_db().await;
        seed_june(&db).await;

        let res = get_profit_loss(&db, ACCOUNT, &june_query()).await.unwrap();

        assert_eq!(res.gross_sales.current, 100.0);
        assert_eq!(res.refund.current, -60.0);
        assert_eq!(res.net_sales.current, 40.0);
        assert_eq!(res.market_place_fee.current, -9.0);
        assert_eq!(res.other_fee.current, -2.0);
        // 2 x 4.0 + 1 x 10.0
        assert_eq!(res.total_cogs.current, -18.0);
        assert_eq!(res.ad_spend.current, -5.0);
        // 40 - 9 - 2 - 18 - 5
        assert_eq!(res.net_profit.current, 6.0);
        assert_eq!(res.margin.current, 15.0);
        // expense growth runs on magnitudes
        assert_eq!(res.market_place_fee.percentage_growth, 9.0);
        assert_eq!(res.market_place_fee.difference, -9.0);
    }

    #[tokio::test]
    async fn test_profit_loss_adds_back_reimbursements() {
        let db = memory_db().await;
        seed_june(&db).await;
        a006_financial_event::repository::upsert(
            &db,
            &FinancialEvent {
                account_id: ACCOUNT.into(),
                asp_id: SELLER.into(),
                az_order_id: String::new(),
                event_type: FinancialEventType::Reimbursement,
                event_id: "R-77".into(),
                sku: Some("SKU-K".into()),
                description: Some("Lost_Warehouse".into()),
                amount: 12.5,
                currency: Some("USD".into()),
                posted_date: NaiveDate::from_ymd_opt(2023, 6, 19).unwrap(),
            },
        )
        .await
        .unwrap();

        let res = get_profit_loss(&db, ACCOUNT, &june_query()).await.unwrap();

        assert_eq!(res.reimbursement.current, 12.5);
        assert_eq!(res.net_profit.current, 18.5);
    }

    #[tokio::test]
    async fn test_profit_loss_empty_window_is_zero() {
        let db = memory_db().await;

        let res = get_profit_loss(&db, ACCOUNT, &june_query()).await.unwrap();

        assert_eq!(res.net_profit.current, 0.0);
        assert_eq!(res.margin.current, 0.0);
        assert_eq!(res.net_profit.percentage_growth, 0.0);
    }
}
