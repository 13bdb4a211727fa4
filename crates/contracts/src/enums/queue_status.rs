use serde::{Deserialize, Serialize};

/// Status of an enqueued background job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    New,
    Processing,
    Completed,
    Failed,
}

impl QueueStatus {
    pub fn code(&self) -> &'static str {
        match self {
            QueueStatus::New => "NEW",
            QueueStatus::Processing => "PROCESSING",
            QueueStatus::Completed => "COMPLETED",
            QueueStatus::Failed => "FAILED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NEW" => Some(QueueStatus::New),
            "PROCESSING" => Some(QueueStatus::Processing),
            "COMPLETED" => Some(QueueStatus::Completed),
            "FAILED" => Some(QueueStatus::Failed),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, next: QueueStatus) -> bool {
        matches!(
            (self, next),
            (QueueStatus::New, QueueStatus::Processing)
                | (QueueStatus::Processing, QueueStatus::Completed)
                | (QueueStatus::Processing, QueueStatus::Failed)
        )
    }
}

/// Kinds of jobs handed to the external worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Export,
    AdsSync,
}

impl TaskType {
    pub fn code(&self) -> &'static str {
        match self {
            TaskType::Export => "EXPORT",
            TaskType::AdsSync => "ADS_SYNC",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "EXPORT" => Some(TaskType::Export),
            "ADS_SYNC" => Some(TaskType::AdsSync),
            _ => None,
        }
    }
}
