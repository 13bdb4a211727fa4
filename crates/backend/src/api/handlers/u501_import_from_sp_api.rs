use axum::extract::State;
use contracts::usecases::u501_import_from_sp_api::request::FinancesSyncRequest;
use contracts::usecases::u501_import_from_sp_api::response::IngestSummary;

use super::respond;
use crate::api::extract::ApiJson;
use crate::shared::context::AppContext;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentAccount;
use crate::usecases::u501_import_from_sp_api::executor;

/// POST /api/finances/sync
pub async fn sync_financial_events(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(request): ApiJson<FinancesSyncRequest>,
) -> ApiResult<IngestSummary> {
    tracing::info!(
        "Finances sync for {}/{}: {} .. {}",
        account.id,
        request.asp_id,
        request.posted_after,
        request.posted_before
    );
    let summary =
        executor::sync_financial_events(&ctx.db, &ctx.sp_api, &account.id, request).await?;
    respond("financial events synced", summary)
}
