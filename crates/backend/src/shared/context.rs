use moka::future::Cache;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use contracts::enums::report_type::ReportSource;

use crate::shared::config::Config;
use crate::shared::marketplaces::amazon::lwa::{LwaClient, TokenCache};
use crate::shared::marketplaces::amazon::ReportProvider;
use crate::usecases::u501_import_from_sp_api::sp_api_client::SpApiClient;
use crate::usecases::u502_import_from_amazon_ads::ads_api_client::AdsApiClient;

/// Pending Ads consent `state` values live this long
const OAUTH_STATE_TTL: Duration = Duration::from_secs(600);

/// Handles every request needs, passed as axum state
#[derive(Clone)]
pub struct AppContext {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub sp_api: Arc<SpApiClient>,
    pub ads: Arc<AdsApiClient>,
    /// Ads consent `state` -> account id
    pub oauth_states: Cache<String, String>,
}

impl AppContext {
    pub fn new(db: DatabaseConnection, config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.amazon.http_timeout_secs))
            .gzip(true)
            .build()?;

        let tokens = TokenCache::new(Duration::from_secs(config.amazon.token_ttl_secs));
        let lwa = Arc::new(LwaClient::new(http.clone(), &config.amazon, tokens));

        Ok(Self {
            db,
            sp_api: Arc::new(SpApiClient::new(http.clone(), &config.amazon, lwa.clone())),
            ads: Arc::new(AdsApiClient::new(http, &config.amazon, lwa)),
            oauth_states: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(OAUTH_STATE_TTL)
                .build(),
            config: Arc::new(config),
        })
    }

    /// Client that serves reports of the given source
    pub fn report_provider(&self, source: ReportSource) -> &dyn ReportProvider {
        match source {
            ReportSource::SpApi => self.sp_api.as_ref(),
            ReportSource::Ads => self.ads.as_ref(),
        }
    }
}
