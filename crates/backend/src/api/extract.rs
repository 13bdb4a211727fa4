use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::shared::error::ApiError;

/// `Query` whose rejection is a validation envelope under the `query` key
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(|rejection| ApiError::field("query", rejection.body_text()))
    }
}

/// `Json` whose rejection is a validation envelope under the `body` key
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| ApiJson(value))
            .map_err(|rejection| ApiError::field("body", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request as HttpRequest, StatusCode},
        response::IntoResponse,
        routing::{get, post},
        Router,
    };
    use contracts::shared::analytics::DashboardQuery;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Named {
        name: String,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/query",
                get(|ApiQuery(q): ApiQuery<DashboardQuery>| async move {
                    q.asp_id.unwrap_or_default()
                }),
            )
            .route(
                "/json",
                post(|ApiJson(body): ApiJson<Named>| async move { body.name }),
            )
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_query_uses_envelope() {
        let response = app()
            .oneshot(
                HttpRequest::get("/query?asp_id=A1&compare_previous_year=yes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let json = body_json(response).await;
        assert_eq!(json["status"], false);
        assert_eq!(json["message"], "validation failed");
        assert!(json["error"]["query"].is_string());
    }

    #[tokio::test]
    async fn test_bad_json_uses_envelope() {
        let response = app()
            .oneshot(
                HttpRequest::post("/json")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"nope\": 1}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], false);
        assert!(json["error"]["body"].is_string());
    }

    #[tokio::test]
    async fn test_valid_input_passes_through() {
        let response = app()
            .oneshot(HttpRequest::get("/query?asp_id=A1").body(Body::empty()).unwrap())
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
