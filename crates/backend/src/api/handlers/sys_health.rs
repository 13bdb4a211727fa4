use axum::extract::State;
use serde_json::{json, Value};

use super::respond;
use crate::shared::context::AppContext;
use crate::shared::error::ApiResult;

/// GET /health
pub async fn health(State(ctx): State<AppContext>) -> ApiResult<Value> {
    ctx.db.ping().await?;
    respond("ok", json!({ "database": "up" }))
}
