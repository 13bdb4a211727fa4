use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::subscription_status::SubscriptionStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub code: String,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub interval_months: i32,
    pub is_active: bool,
}

/// An account's subscription to a plan.
///
/// Only one subscription per account may be ACTIVE; the billing service
/// deactivates the others when one is activated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub account_id: String,
    pub plan_id: String,
    pub status: SubscriptionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new_for_insert(account_id: String, plan_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            plan_id,
            status: SubscriptionStatus::New,
            started_at: None,
            ends_at: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn activate(&mut self, plan: &Plan) -> Result<(), String> {
        self.transition(SubscriptionStatus::Active)?;
        let now = Utc::now();
        self.started_at = Some(now);
        self.ends_at = now.checked_add_months(Months::new(plan.interval_months.max(1) as u32));
        Ok(())
    }

    /// Extends an ACTIVE subscription by one plan interval, counted from the
    /// current end or from now when it already lapsed
    pub fn renew(&mut self, plan: &Plan) -> Result<(), String> {
        if self.status != SubscriptionStatus::Active {
            return Err(format!(
                "subscription {} cannot renew from {}",
                self.id,
                self.status.code()
            ));
        }
        let now = Utc::now();
        let from = self.ends_at.filter(|end| *end > now).unwrap_or(now);
        self.ends_at = from.checked_add_months(Months::new(plan.interval_months.max(1) as u32));
        self.updated_at = now;
        Ok(())
    }

    pub fn deactivate(&mut self) -> Result<(), String> {
        self.transition(SubscriptionStatus::Inactive)?;
        self.cancelled_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, next: SubscriptionStatus) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "subscription {} cannot move from {} to {}",
                self.id,
                self.status.code(),
                next.code()
            ));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Captured,
    Failed,
}

impl PaymentStatus {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentStatus::Captured => "CAPTURED",
            PaymentStatus::Failed => "FAILED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "CAPTURED" => Some(PaymentStatus::Captured),
            "FAILED" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub account_id: String,
    pub subscription_id: String,
    pub provider_payment_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub plan_id: String,
}

/// Payment provider notification, already verified by the webhook handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentWebhookEvent {
    pub subscription_id: String,
    pub provider_payment_id: String,
    pub status: PaymentStatus,
    pub amount: f64,
    pub currency: String,
}
