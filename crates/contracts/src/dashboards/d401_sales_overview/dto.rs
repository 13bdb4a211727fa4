use serde::{Deserialize, Serialize};

use crate::shared::analytics::{ComparedMetric, ComparisonPeriods};

/// Headline sales cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOverviewResponse {
    pub periods: ComparisonPeriods,
    pub gross_sales: ComparedMetric,
    pub units_sold: ComparedMetric,
    pub order_count: ComparedMetric,
    /// gross_sales / order_count
    pub average_order_value: ComparedMetric,
    /// Displayed negative
    pub refund: ComparedMetric,
    pub page_views: ComparedMetric,
    pub sessions: ComparedMetric,
    /// order_count / sessions, percent
    pub conversion_rate: ComparedMetric,
}
