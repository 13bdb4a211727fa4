use contracts::system::tasks::aggregate::{EnqueueTaskRequest, QueueTask};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::ApiError;

/// Stores a NEW task for the external worker; nothing runs in-process
pub async fn enqueue(
    db: &DatabaseConnection,
    account_id: &str,
    mut request: EnqueueTaskRequest,
) -> Result<QueueTask, ApiError> {
    request.entity_type = request.entity_type.trim().to_string();
    if request.entity_type.is_empty() {
        return Err(ApiError::field("entity_type", "is required"));
    }

    let task = QueueTask::new_for_insert(account_id.to_string(), request);
    repository::insert(db, &task).await?;
    tracing::info!(
        "Enqueued {} task {} for account {}",
        task.task_type.code(),
        task.id,
        account_id
    );
    Ok(task)
}

pub async fn get(db: &DatabaseConnection, account_id: &str, id: &str) -> Result<QueueTask, ApiError> {
    repository::get(db, account_id, id)
        .await?
        .ok_or(ApiError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::queue_status::{QueueStatus, TaskType};
    use serde_json::json;

    use crate::shared::data::db::test_support::memory_db;

    fn export_orders() -> EnqueueTaskRequest {
        EnqueueTaskRequest {
            task_type: TaskType::Export,
            entity_type: " orders ".into(),
            payload: json!({"from_date": "2023-06-01", "to_date": "2023-06-30"}),
        }
    }

    #[tokio::test]
    async fn test_enqueue_then_get() {
        let db = memory_db().await;

        let task = enqueue(&db, "acc-1", export_orders()).await.unwrap();
        let stored = get(&db, "acc-1", &task.id).await.unwrap();

        assert_eq!(stored.status, QueueStatus::New);
        assert_eq!(stored.task_type, TaskType::Export);
        assert_eq!(stored.entity_type, "orders");
        assert_eq!(stored.payload["from_date"], "2023-06-01");
    }

    #[tokio::test]
    async fn test_task_is_scoped_to_account() {
        let db = memory_db().await;
        let task = enqueue(&db, "acc-1", export_orders()).await.unwrap();

        assert!(matches!(
            get(&db, "acc-2", &task.id).await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_enqueue_requires_entity_type() {
        let db = memory_db().await;
        let request = EnqueueTaskRequest {
            entity_type: String::new(),
            ..export_orders()
        };
        assert!(matches!(
            enqueue(&db, "acc-1", request).await,
            Err(ApiError::Validation(_))
        ));
    }
}
