use serde::{Deserialize, Serialize};

use crate::enums::report_type::AdProduct;
use crate::shared::analytics::{ComparedMetric, ComparisonPeriods};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdPerformanceResponse {
    pub periods: ComparisonPeriods,
    /// Displayed negative
    pub ad_spend: ComparedMetric,
    pub ad_sales: ComparedMetric,
    pub impressions: ComparedMetric,
    pub clicks: ComparedMetric,
    pub ad_orders: ComparedMetric,
    pub acos: ComparedMetric,
    pub tacos: ComparedMetric,
    pub roas: ComparedMetric,
    pub ctr: ComparedMetric,
    pub cpc: ComparedMetric,
    pub by_ad_product: Vec<AdProductBreakdown>,
}

/// Current-window split by sponsored ads product line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdProductBreakdown {
    pub ad_product: AdProduct,
    pub spend: f64,
    pub sales: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub acos: f64,
}
