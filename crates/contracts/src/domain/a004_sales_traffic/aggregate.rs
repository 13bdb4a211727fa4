use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily account-level sales & traffic counters.
/// Natural key: `(account_id, asp_id, marketplace_id, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesTrafficSummary {
    pub account_id: String,
    pub asp_id: String,
    pub marketplace_id: String,
    pub date: NaiveDate,
    pub ordered_product_sales: f64,
    pub currency: Option<String>,
    pub units_ordered: i64,
    pub total_order_items: i64,
    pub page_views: i64,
    pub sessions: i64,
    pub buy_box_percentage: f64,
    /// The raw per-date entry as delivered by Amazon
    pub breakdown_json: serde_json::Value,
}

/// Daily per-ASIN sales & traffic counters.
/// Natural key: `(account_id, asp_id, marketplace_id, child_asin, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesTrafficAsin {
    pub account_id: String,
    pub asp_id: String,
    pub marketplace_id: String,
    pub date: NaiveDate,
    pub parent_asin: Option<String>,
    pub child_asin: String,
    pub sku: Option<String>,
    pub ordered_product_sales: f64,
    pub units_ordered: i64,
    pub total_order_items: i64,
    pub page_views: i64,
    pub sessions: i64,
    pub buy_box_percentage: f64,
}

impl SalesTrafficAsin {
    pub fn validate(&self) -> Result<(), String> {
        if self.child_asin.trim().is_empty() {
            return Err("child_asin is required".into());
        }
        Ok(())
    }
}
