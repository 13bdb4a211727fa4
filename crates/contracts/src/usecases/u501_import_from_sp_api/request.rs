use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Pull financial events (reimbursements, service fees, adjustments) for a window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancesSyncRequest {
    pub asp_id: String,
    pub marketplace_id: String,
    pub posted_after: NaiveDate,
    pub posted_before: NaiveDate,
}
