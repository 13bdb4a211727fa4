use moka::future::Cache;
use serde::Deserialize;
use std::time::Duration;

use super::retry::send_with_retry;
use super::AmazonError;
use crate::shared::config::AmazonConfig;

/// Login with Amazon token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct LwaTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Client credentials of one LWA application (SP-API app or Ads app)
#[derive(Debug, Clone)]
pub struct LwaApp {
    pub client_id: String,
    pub client_secret: String,
}

/// Access tokens by cache key, expiring after the configured TTL.
///
/// Lookups are check-then-refresh without a lock, so two concurrent misses
/// may both refresh; the later insert wins.
#[derive(Clone)]
pub struct TokenCache {
    inner: Cache<String, String>,
}

impl TokenCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: &str, token: String) {
        self.inner.insert(key.to_string(), token).await;
    }
}

pub struct LwaClient {
    http: reqwest::Client,
    token_url: String,
    retry_delay: Duration,
    cache: TokenCache,
}

impl LwaClient {
    pub fn new(http: reqwest::Client, config: &AmazonConfig, cache: TokenCache) -> Self {
        Self {
            http,
            token_url: config.lwa_token_url.clone(),
            retry_delay: Duration::from_secs(config.rate_limit_retry_secs),
            cache,
        }
    }

    /// Cached access token for `cache_key`, refreshed through LWA on a miss
    pub async fn access_token(
        &self,
        cache_key: &str,
        app: &LwaApp,
        refresh_token: &str,
    ) -> Result<String, AmazonError> {
        if let Some(token) = self.cache.get(cache_key).await {
            return Ok(token);
        }
        if refresh_token.trim().is_empty() {
            return Err(AmazonError::MissingCredential("refresh token"));
        }

        tracing::debug!("Refreshing LWA access token for {}", cache_key);
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", app.client_id.as_str()),
            ("client_secret", app.client_secret.as_str()),
        ];
        let token = self.post_token(&params).await?;
        self.cache.insert(cache_key, token.access_token.clone()).await;
        Ok(token.access_token)
    }

    /// Exchanges an OAuth authorization code for a refresh/access token pair
    pub async fn exchange_code(
        &self,
        app: &LwaApp,
        code: &str,
        redirect_uri: &str,
    ) -> Result<LwaTokenResponse, AmazonError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", app.client_id.as_str()),
            ("client_secret", app.client_secret.as_str()),
        ];
        self.post_token(&params).await
    }

    async fn post_token(&self, params: &[(&str, &str)]) -> Result<LwaTokenResponse, AmazonError> {
        let request = self.http.post(&self.token_url).form(params);
        let response = send_with_retry("lwa", request, self.retry_delay).await?;
        let body = response.text().await?;
        serde_json::from_str::<LwaTokenResponse>(&body)
            .map_err(|e| AmazonError::Decode(format!("LWA token response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> LwaClient {
        let config = AmazonConfig {
            lwa_token_url: format!("{}/auth/o2/token", url),
            rate_limit_retry_secs: 0,
            ..AmazonConfig::default()
        };
        LwaClient::new(
            reqwest::Client::new(),
            &config,
            TokenCache::new(Duration::from_secs(3600)),
        )
    }

    fn app() -> LwaApp {
        LwaApp {
            client_id: "amzn1.application-oa2-client.x".into(),
            client_secret: "secret".into(),
        }
    }

    #[tokio::test]
    async fn test_access_token_is_cached_per_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/o2/token")
            .match_body(mockito::Matcher::UrlEncoded(
                "grant_type".into(),
                "refresh_token".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"Atza|abc","token_type":"bearer","expires_in":3600}"#)
            .expect(1)
            .create_async()
            .await;

        let lwa = client(&server.url());
        let first = lwa.access_token("sp:A1SELLER", &app(), "Atzr|refresh").await.unwrap();
        let second = lwa.access_token("sp:A1SELLER", &app(), "Atzr|refresh").await.unwrap();

        mock.assert_async().await;
        assert_eq!(first, "Atza|abc");
        assert_eq!(second, "Atza|abc");
    }

    #[tokio::test]
    async fn test_exchange_code() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/o2/token")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                mockito::Matcher::UrlEncoded("code".into(), "ANcode".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token":"Atza|a","refresh_token":"Atzr|r"}"#)
            .create_async()
            .await;

        let lwa = client(&server.url());
        let token = lwa
            .exchange_code(&app(), "ANcode", "https://app.example/ads/callback")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(token.refresh_token.as_deref(), Some("Atzr|r"));
    }

    #[tokio::test]
    async fn test_missing_refresh_token() {
        let lwa = client("http://127.0.0.1:9");
        let err = lwa.access_token("sp:X", &app(), " ").await.unwrap_err();
        assert!(matches!(err, AmazonError::MissingCredential(_)));
    }
}
