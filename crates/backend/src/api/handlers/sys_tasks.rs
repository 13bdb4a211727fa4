use axum::extract::{Path, State};
use contracts::system::tasks::aggregate::{EnqueueTaskRequest, QueueTask};

use super::respond;
use crate::api::extract::ApiJson;
use crate::shared::context::AppContext;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentAccount;
use crate::system::tasks::service;

/// POST /api/tasks
pub async fn enqueue(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(request): ApiJson<EnqueueTaskRequest>,
) -> ApiResult<QueueTask> {
    let task = service::enqueue(&ctx.db, &account.id, request).await?;
    respond("task enqueued", task)
}

/// GET /api/tasks/:id
pub async fn get_by_id(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<String>,
) -> ApiResult<QueueTask> {
    let task = service::get(&ctx.db, &account.id, &id).await?;
    respond("task found", task)
}
