use serde::{Deserialize, Serialize};

use crate::shared::analytics::{ComparedMetric, ComparisonPeriods};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceBreakdownResponse {
    pub periods: ComparisonPeriods,
    pub total: ComparedMetric,
    /// Sorted by current gross sales, largest first
    pub rows: Vec<MarketplaceRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceRow {
    pub marketplace_id: String,
    pub marketplace_name: String,
    pub currency: Option<String>,
    pub gross_sales: ComparedMetric,
    pub units_sold: ComparedMetric,
    pub order_count: ComparedMetric,
    /// Share of the current-window total, percent
    pub share_percent: f64,
}
