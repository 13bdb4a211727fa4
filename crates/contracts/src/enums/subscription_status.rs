use serde::{Deserialize, Serialize};

/// Billing subscription lifecycle: NEW -> ACTIVE -> INACTIVE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    New,
    Active,
    Inactive,
}

impl SubscriptionStatus {
    pub fn code(&self) -> &'static str {
        match self {
            SubscriptionStatus::New => "NEW",
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::Inactive => "INACTIVE",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NEW" => Some(SubscriptionStatus::New),
            "ACTIVE" => Some(SubscriptionStatus::Active),
            "INACTIVE" => Some(SubscriptionStatus::Inactive),
            _ => None,
        }
    }

    /// A NEW subscription may also be dropped straight to INACTIVE (failed payment, cancel)
    pub fn can_transition_to(&self, next: SubscriptionStatus) -> bool {
        matches!(
            (self, next),
            (SubscriptionStatus::New, SubscriptionStatus::Active)
                | (SubscriptionStatus::New, SubscriptionStatus::Inactive)
                | (SubscriptionStatus::Active, SubscriptionStatus::Inactive)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use SubscriptionStatus::*;
        assert!(New.can_transition_to(Active));
        assert!(Active.can_transition_to(Inactive));
        assert!(New.can_transition_to(Inactive));
        assert!(!Inactive.can_transition_to(Active));
        assert!(!Active.can_transition_to(New));
        assert!(!Active.can_transition_to(Active));
    }
}
