use serde::{Deserialize, Serialize};

use crate::shared::analytics::{ComparedMetric, ComparisonPeriods};

/// Profit and loss statement for the selected window.
///
/// Expense lines (`refund`, `market_place_fee`, `other_fee`, `total_cogs`,
/// `ad_spend`) are reported as negative numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitLossResponse {
    pub periods: ComparisonPeriods,
    pub gross_sales: ComparedMetric,
    pub refund: ComparedMetric,
    pub net_sales: ComparedMetric,
    pub market_place_fee: ComparedMetric,
    pub other_fee: ComparedMetric,
    pub total_cogs: ComparedMetric,
    pub ad_spend: ComparedMetric,
    pub reimbursement: ComparedMetric,
    pub net_profit: ComparedMetric,
    /// net_profit / net_sales, percent
    pub margin: ComparedMetric,
}
