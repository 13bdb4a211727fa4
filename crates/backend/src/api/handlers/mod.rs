use axum::Json;
use contracts::shared::api_response::ApiResponse;

use crate::shared::error::ApiResult;

// Aggregate handlers
pub mod a001_account;
pub mod a002_seller_connection;
pub mod a003_order;
pub mod a008_amazon_report;
pub mod a009_billing;
pub mod a011_product;

// Dashboard handlers (d401-d404)
pub mod d401_sales_overview;
pub mod d402_profit_loss;
pub mod d403_ad_performance;
pub mod d404_marketplace_breakdown;

// UseCase handlers
pub mod u501_import_from_sp_api;
pub mod u502_import_from_amazon_ads;

// System handlers
pub mod sys_health;
pub mod sys_tasks;

/// Success envelope
pub(crate) fn respond<T>(message: &str, data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(message, data)))
}
