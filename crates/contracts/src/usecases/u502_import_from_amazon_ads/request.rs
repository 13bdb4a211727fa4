use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::report_type::AdProduct;

/// Redirect target of the Amazon Ads consent screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdsCallbackRequest {
    pub code: String,
    pub state: String,
    pub asp_id: String,
    pub marketplace_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdsReportRequest {
    pub asp_id: String,
    pub marketplace_id: String,
    pub ad_product: AdProduct,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
