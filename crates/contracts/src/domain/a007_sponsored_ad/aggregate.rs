use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::report_type::AdProduct;

/// Daily performance of one ad entity (campaign / ad group / keyword / ASIN).
///
/// Natural key: `(account_id, asp_id, ad_product, payload_date, campaign_id,
/// ad_group_id, keyword_id, asin)`; absent ids are stored as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsoredAd {
    pub account_id: String,
    pub asp_id: String,
    pub ad_product: AdProduct,
    pub payload_date: NaiveDate,
    pub campaign_id: String,
    pub campaign_name: Option<String>,
    pub ad_group_id: String,
    pub keyword_id: String,
    pub asin: String,
    pub impressions: i64,
    pub clicks: i64,
    pub cost: f64,
    pub sales: f64,
    pub orders: i64,
    pub units: i64,
}

impl SponsoredAd {
    pub fn validate(&self) -> Result<(), String> {
        if self.campaign_id.trim().is_empty() {
            return Err("campaign_id is required".into());
        }
        if self.impressions < 0 || self.clicks < 0 {
            return Err("counters must not be negative".into());
        }
        Ok(())
    }
}
