use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinancialEventType {
    Reimbursement,
    ServiceFee,
    Adjustment,
}

impl FinancialEventType {
    pub fn code(&self) -> &'static str {
        match self {
            FinancialEventType::Reimbursement => "REIMBURSEMENT",
            FinancialEventType::ServiceFee => "SERVICE_FEE",
            FinancialEventType::Adjustment => "ADJUSTMENT",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "REIMBURSEMENT" => Some(FinancialEventType::Reimbursement),
            "SERVICE_FEE" => Some(FinancialEventType::ServiceFee),
            "ADJUSTMENT" => Some(FinancialEventType::Adjustment),
            _ => None,
        }
    }
}

/// Reimbursement, service fee or adjustment line.
/// Natural key: `(account_id, asp_id, az_order_id, event_type, event_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialEvent {
    pub account_id: String,
    pub asp_id: String,
    /// Empty for events not tied to an order
    pub az_order_id: String,
    pub event_type: FinancialEventType,
    pub event_id: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    pub posted_date: NaiveDate,
}

impl FinancialEvent {
    pub fn validate(&self) -> Result<(), String> {
        if self.event_id.trim().is_empty() {
            return Err("event_id is required".into());
        }
        Ok(())
    }
}
