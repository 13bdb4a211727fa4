use serde::{Deserialize, Serialize};

/// Processing state of an Amazon report (SP-API or Ads API)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    New,
    InQueue,
    InProgress,
    Done,
    Cancelled,
    Fatal,
}

impl ReportStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ReportStatus::New => "NEW",
            ReportStatus::InQueue => "IN_QUEUE",
            ReportStatus::InProgress => "IN_PROGRESS",
            ReportStatus::Done => "DONE",
            ReportStatus::Cancelled => "CANCELLED",
            ReportStatus::Fatal => "FATAL",
        }
    }

    /// Parses both SP-API `processingStatus` and Ads API report `status` values
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NEW" => Some(ReportStatus::New),
            "IN_QUEUE" | "PENDING" => Some(ReportStatus::InQueue),
            "IN_PROGRESS" | "PROCESSING" => Some(ReportStatus::InProgress),
            "DONE" | "COMPLETED" | "SUCCESS" => Some(ReportStatus::Done),
            "CANCELLED" => Some(ReportStatus::Cancelled),
            "FATAL" | "FAILED" | "FAILURE" => Some(ReportStatus::Fatal),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReportStatus::Done | ReportStatus::Cancelled | ReportStatus::Fatal
        )
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ads_statuses_map_onto_report_lifecycle() {
        assert_eq!(ReportStatus::from_code("PENDING"), Some(ReportStatus::InQueue));
        assert_eq!(ReportStatus::from_code("PROCESSING"), Some(ReportStatus::InProgress));
        assert_eq!(ReportStatus::from_code("COMPLETED"), Some(ReportStatus::Done));
        assert_eq!(ReportStatus::from_code("FAILED"), Some(ReportStatus::Fatal));
        assert_eq!(ReportStatus::from_code("bogus"), None);
    }

    #[test]
    fn test_serde_uses_amazon_codes() {
        let json = serde_json::to_string(&ReportStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        assert!(ReportStatus::Done.is_terminal());
        assert!(!ReportStatus::InQueue.is_terminal());
    }
}
