use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// FBA customer return line.
/// Natural key: `(account_id, asp_id, order_id, sku, license_plate_number)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbaReturn {
    pub account_id: String,
    pub asp_id: String,
    pub order_id: String,
    pub sku: String,
    pub asin: Option<String>,
    pub fnsku: Option<String>,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub fulfillment_center_id: Option<String>,
    pub detailed_disposition: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
    pub license_plate_number: String,
    pub return_date: Option<NaiveDate>,
}

impl FbaReturn {
    pub fn validate(&self) -> Result<(), String> {
        if self.order_id.trim().is_empty() {
            return Err("order_id is required".into());
        }
        if self.sku.trim().is_empty() {
            return Err("sku is required".into());
        }
        Ok(())
    }
}
