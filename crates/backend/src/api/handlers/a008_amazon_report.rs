use axum::extract::{Path, State};
use contracts::domain::a008_amazon_report::aggregate::{AmazonReport, CreateReportRequest};
use contracts::shared::list_query::ListQuery;

use super::respond;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::domain::a008_amazon_report::service;
use crate::shared::context::AppContext;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentAccount;
use crate::usecases::u501_import_from_sp_api::executor;

/// GET /api/reports?asp_id=...&limit=...
pub async fn list(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<AmazonReport>> {
    let reports = service::list(&ctx.db, &account.id, query.asp_id(), query.limit).await?;
    respond("reports fetched", reports)
}

/// GET /api/reports/:id
pub async fn get_by_id(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<String>,
) -> ApiResult<AmazonReport> {
    let report = service::get(&ctx.db, &account.id, &id).await?;
    respond("report found", report)
}

/// POST /api/reports
pub async fn create(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(request): ApiJson<CreateReportRequest>,
) -> ApiResult<AmazonReport> {
    let provider = ctx.report_provider(request.report_type.source());
    let report = executor::create_report(&ctx.db, provider, &account.id, request).await?;
    respond("report requested", report)
}

/// POST /api/reports/:id/verify
pub async fn verify(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<String>,
) -> ApiResult<AmazonReport> {
    let source = service::get(&ctx.db, &account.id, &id).await?.source;
    let report =
        executor::verify_report(&ctx.db, ctx.report_provider(source), &account.id, &id).await?;
    respond("report status updated", report)
}

/// POST /api/reports/:id/retrieve
pub async fn retrieve(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<String>,
) -> ApiResult<AmazonReport> {
    let source = service::get(&ctx.db, &account.id, &id).await?.source;
    let report =
        executor::retrieve_report(&ctx.db, ctx.report_provider(source), &account.id, &id).await?;
    tracing::info!("Report {} ingested {} rows", report.id, report.rows_ingested);
    respond("report retrieved", report)
}
