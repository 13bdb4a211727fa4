use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::shared::api_response::ApiResponse;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors surfaced by handlers. Mapped to HTTP status and envelope here only.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation failed: {0:?}")]
    Validation(BTreeMap<String, String>),
    /// `token_missing`, `token_invalid`, `token_expired`
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    /// `account_not_found`, `account_deactivated`, `subscription_inactive`
    #[error("account rejected: {0}")]
    AccountRejected(&'static str),
    #[error("no data found")]
    NotFound,
    #[error("upstream call failed: {0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Single-field validation error
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), message.into());
        ApiError::Validation(errors)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        ApiError::Internal(err.into())
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation failed".to_string(),
                serde_json::to_value(errors).ok(),
            ),
            ApiError::Unauthorized(key) => (
                StatusCode::UNAUTHORIZED,
                key.to_string(),
                None,
            ),
            ApiError::AccountRejected(key) => (StatusCode::BAD_REQUEST, key.to_string(), None),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "no data found".to_string(), None),
            ApiError::Upstream(detail) => {
                tracing::error!("Upstream error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upstream service unavailable".to_string(),
                    None,
                )
            }
            ApiError::Internal(err) => {
                tracing::error!("Internal server error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    None,
                )
            }
        };
        (status, Json(ApiResponse::<()>::failure(message, detail))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_names_the_field() {
        let (status, body) = body_json(ApiError::field("from_date", "expected YYYY-MM-DD")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], false);
        assert_eq!(body["error"]["from_date"], "expected YYYY-MM-DD");
    }

    #[tokio::test]
    async fn test_auth_and_account_keys() {
        let (status, body) = body_json(ApiError::Unauthorized("token_expired")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "token_expired");

        let (status, body) = body_json(ApiError::AccountRejected("account_deactivated")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "account_deactivated");
    }

    #[tokio::test]
    async fn test_upstream_detail_is_not_leaked() {
        let (status, body) =
            body_json(ApiError::Upstream("token=secret refused".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("secret"));
    }
}
