use anyhow::{anyhow, Result};
use contracts::enums::queue_status::{QueueStatus, TaskType};
use contracts::system::tasks::aggregate::QueueTask;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sys_queue_task")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub task_type: String,
    pub entity_type: String,
    pub payload_json: String,
    pub status: String,
    pub error: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for QueueTask {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self> {
        Ok(QueueTask {
            task_type: TaskType::from_code(&m.task_type)
                .ok_or_else(|| anyhow!("unknown task type '{}' on task {}", m.task_type, m.id))?,
            status: QueueStatus::from_code(&m.status)
                .ok_or_else(|| anyhow!("unknown status '{}' on task {}", m.status, m.id))?,
            payload: serde_json::from_str(&m.payload_json)?,
            id: m.id,
            account_id: m.account_id,
            entity_type: m.entity_type,
            error: m.error,
            created_at: m.created_at,
            updated_at: m.updated_at,
            started_at: m.started_at,
            finished_at: m.finished_at,
        })
    }
}

pub async fn insert(db: &DatabaseConnection, task: &QueueTask) -> Result<()> {
    let active = ActiveModel {
        id: Set(task.id.clone()),
        account_id: Set(task.account_id.clone()),
        task_type: Set(task.task_type.code().to_string()),
        entity_type: Set(task.entity_type.clone()),
        payload_json: Set(task.payload.to_string()),
        status: Set(task.status.code().to_string()),
        error: Set(task.error.clone()),
        created_at: Set(task.created_at),
        updated_at: Set(task.updated_at),
        started_at: Set(task.started_at),
        finished_at: Set(task.finished_at),
    };
    active.insert(db).await?;
    Ok(())
}

/// Task by id, only when it belongs to `account_id`
pub async fn get(db: &DatabaseConnection, account_id: &str, id: &str) -> Result<Option<QueueTask>> {
    let model = Entity::find_by_id(id.to_string())
        .filter(Column::AccountId.eq(account_id))
        .one(db)
        .await?;
    model.map(QueueTask::try_from).transpose()
}
