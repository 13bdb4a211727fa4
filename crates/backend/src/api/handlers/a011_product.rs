use axum::extract::State;
use contracts::domain::a011_product::aggregate::{Product, ProductDto};
use contracts::shared::list_query::ListQuery;

use super::respond;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::domain::a011_product::service;
use crate::shared::context::AppContext;
use crate::shared::error::ApiResult;
use crate::system::auth::extractor::CurrentAccount;

/// GET /api/products?asp_id=...
pub async fn list(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<Product>> {
    let products = service::list(&ctx.db, &account.id, query.asp_id()).await?;
    respond("products fetched", products)
}

/// POST /api/products
pub async fn save(
    State(ctx): State<AppContext>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(dto): ApiJson<ProductDto>,
) -> ApiResult<Product> {
    let product = service::save(&ctx.db, &account.id, dto).await?;
    respond("product saved", product)
}
