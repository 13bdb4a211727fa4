use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub amazon: AmazonConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider
    #[serde(default)]
    pub jwt_secret: String,
    /// Shared secret the payment provider sends in `x-webhook-secret`
    #[serde(default)]
    pub webhook_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AmazonConfig {
    pub lwa_token_url: String,
    /// Overrides the regional SP-API host (sandbox, tests)
    #[serde(default)]
    pub sp_api_endpoint: Option<String>,
    /// Overrides the regional Ads API host
    #[serde(default)]
    pub ads_api_endpoint: Option<String>,
    pub ads_authorize_url: String,
    #[serde(default)]
    pub lwa_client_id: String,
    #[serde(default)]
    pub lwa_client_secret: String,
    #[serde(default)]
    pub ads_client_id: String,
    #[serde(default)]
    pub ads_client_secret: String,
    #[serde(default)]
    pub ads_redirect_uri: String,
    /// Fixed wait before the single retry of a throttled (429) call
    pub rate_limit_retry_secs: u64,
    pub token_ttl_secs: u64,
    pub http_timeout_secs: u64,
}

impl Default for AmazonConfig {
    fn default() -> Self {
        Self {
            lwa_token_url: "https://api.amazon.com/auth/o2/token".to_string(),
            sp_api_endpoint: None,
            ads_api_endpoint: None,
            ads_authorize_url: "https://www.amazon.com/ap/oa".to_string(),
            lwa_client_id: String::new(),
            lwa_client_secret: String::new(),
            ads_client_id: String::new(),
            ads_client_secret: String::new(),
            ads_redirect_uri: String::new(),
            rate_limit_retry_secs: 300,
            token_ttl_secs: 3600,
            http_timeout_secs: 60,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
bind = "0.0.0.0:3000"

[database]
path = "target/db/app.db"

[auth]
jwt_secret = ""
webhook_secret = ""

[amazon]
lwa_token_url = "https://api.amazon.com/auth/o2/token"
ads_authorize_url = "https://www.amazon.com/ap/oa"
rate_limit_retry_secs = 300
token_ttl_secs = 3600
http_timeout_secs = 60
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Secrets can be supplied through the environment instead of the file.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = read_config_file()?;
    apply_env_overrides(&mut config);
    Ok(config)
}

fn read_config_file() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) {
    let overrides: [(&str, &mut String); 6] = [
        ("JWT_SECRET", &mut config.auth.jwt_secret),
        ("BILLING_WEBHOOK_SECRET", &mut config.auth.webhook_secret),
        ("AMZ_LWA_CLIENT_ID", &mut config.amazon.lwa_client_id),
        ("AMZ_LWA_CLIENT_SECRET", &mut config.amazon.lwa_client_secret),
        ("AMZ_ADS_CLIENT_ID", &mut config.amazon.ads_client_id),
        ("AMZ_ADS_CLIENT_SECRET", &mut config.amazon.ads_client_secret),
    ];
    for (var, slot) in overrides {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                *slot = value;
            }
        }
    }
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved_path = exe_dir.join(db_path);
            return Ok(resolved_path);
        }
    }

    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.amazon.rate_limit_retry_secs, 300);
        assert_eq!(config.amazon.token_ttl_secs, 3600);
        assert_eq!(config.server.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[database]\npath = \"x.db\"\n").unwrap();
        assert_eq!(config.amazon.rate_limit_retry_secs, 300);
        assert!(config.auth.jwt_secret.is_empty());
    }
}
