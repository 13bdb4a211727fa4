use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;

use super::AmazonError;

/// Header Amazon sets on throttled responses that carry a usage-plan limit
pub const RATE_LIMIT_HEADER: &str = "x-amzn-RateLimit-Limit";

/// Sends the request; a 429 without a rate-limit header is retried exactly once
/// after `delay`. Any other failure status is returned as `AmazonError::Status`.
pub async fn send_with_retry(
    api: &'static str,
    request: RequestBuilder,
    delay: Duration,
) -> Result<Response, AmazonError> {
    let retry = request.try_clone();
    let response = request.send().await?;

    let response = if should_retry(&response) {
        match retry {
            Some(retry) => {
                tracing::warn!(
                    "{} throttled without {}, retrying once in {}s",
                    api,
                    RATE_LIMIT_HEADER,
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                retry.send().await?
            }
            None => response,
        }
    } else {
        response
    };

    ensure_success(api, response).await
}

fn should_retry(response: &Response) -> bool {
    response.status() == StatusCode::TOO_MANY_REQUESTS
        && !response.headers().contains_key(RATE_LIMIT_HEADER)
}

async fn ensure_success(api: &'static str, response: Response) -> Result<Response, AmazonError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::error!("{} request failed with status {}: {}", api, status, body);
    Err(AmazonError::Status {
        api,
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_throttle_without_limit_header_retries_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/reports")
            .with_status(429)
            .expect(2)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = send_with_retry(
            "sp-api",
            client.get(format!("{}/reports", server.url())),
            Duration::ZERO,
        )
        .await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(AmazonError::Status { status: 429, .. })
        ));
    }

    #[tokio::test]
    async fn test_throttle_with_limit_header_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/reports")
            .with_status(429)
            .with_header(RATE_LIMIT_HEADER, "0.0167")
            .expect(1)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = send_with_retry(
            "sp-api",
            client.get(format!("{}/reports", server.url())),
            Duration::ZERO,
        )
        .await;

        mock.assert_async().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ok")
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let response = send_with_retry(
            "sp-api",
            client.get(format!("{}/ok", server.url())),
            Duration::ZERO,
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
