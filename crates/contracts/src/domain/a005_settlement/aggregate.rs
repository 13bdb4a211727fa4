use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One financial line of a V2 settlement flat file.
///
/// Natural key: `(selling_partner_id, settlement_id, order_id, order_item_code,
/// amount_type, amount_description)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementLine {
    pub account_id: String,
    pub selling_partner_id: String,
    pub settlement_id: String,
    pub order_id: String,
    pub order_item_code: String,
    pub sku: Option<String>,
    pub transaction_type: String,
    pub amount_type: String,
    pub amount_description: String,
    pub amount: f64,
    pub currency: Option<String>,
    pub quantity: i64,
    pub posted_date: Option<NaiveDate>,
}

impl SettlementLine {
    pub fn validate(&self) -> Result<(), String> {
        if self.settlement_id.trim().is_empty() {
            return Err("settlement_id is required".into());
        }
        if self.amount_type.trim().is_empty() {
            return Err("amount_type is required".into());
        }
        Ok(())
    }
}
