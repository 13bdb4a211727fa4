use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::queue_status::{QueueStatus, TaskType};

/// A job handed to the external worker (exports, ads sync)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueTask {
    pub id: String,
    pub account_id: String,
    pub task_type: TaskType,
    /// Free-form tag naming what the job works on, e.g. "orders"
    pub entity_type: String,
    pub payload: serde_json::Value,
    pub status: QueueStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl QueueTask {
    pub fn new_for_insert(account_id: String, request: EnqueueTaskRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            task_type: request.task_type,
            entity_type: request.entity_type,
            payload: request.payload,
            status: QueueStatus::New,
            error: None,
            created_at: now,
            updated_at: now,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn transition(&mut self, next: QueueStatus, error: Option<String>) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "task {} cannot move from {} to {}",
                self.id,
                self.status.code(),
                next.code()
            ));
        }
        let now = Utc::now();
        match next {
            QueueStatus::Processing => self.started_at = Some(now),
            QueueStatus::Completed | QueueStatus::Failed => self.finished_at = Some(now),
            QueueStatus::New => {}
        }
        self.status = next;
        self.error = error;
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueTaskRequest {
    pub task_type: TaskType,
    pub entity_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_lifecycle() {
        let mut task = QueueTask::new_for_insert(
            "acc".into(),
            EnqueueTaskRequest {
                task_type: TaskType::Export,
                entity_type: "orders".into(),
                payload: serde_json::Value::Null,
            },
        );
        assert!(task.transition(QueueStatus::Completed, None).is_err());
        task.transition(QueueStatus::Processing, None).unwrap();
        assert!(task.started_at.is_some());
        task.transition(QueueStatus::Failed, Some("boom".into())).unwrap();
        assert_eq!(task.error.as_deref(), Some("boom"));
        assert!(task.finished_at.is_some());
        assert!(task.transition(QueueStatus::Processing, None).is_err());
    }
}
