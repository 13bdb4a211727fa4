use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::marketplace_type::{AmazonRegion, MarketplaceType};

/// Amazon seller (ASP) authorised for an account in one marketplace.
///
/// Refresh tokens are write-only from the API's point of view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerConnection {
    pub id: String,
    pub account_id: String,
    /// Selling partner id
    pub asp_id: String,
    pub marketplace_id: String,
    pub region: AmazonRegion,
    #[serde(skip_serializing, default)]
    pub sp_refresh_token: String,
    #[serde(skip_serializing, default)]
    pub ads_refresh_token: Option<String>,
    pub ads_profile_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deactivated_at: Option<DateTime<Utc>>,
}

impl SellerConnection {
    pub fn new_for_insert(account_id: String, dto: SellerConnectionDto) -> Result<Self, String> {
        let marketplace = MarketplaceType::from_code(&dto.marketplace_id)
            .ok_or_else(|| format!("unknown marketplace_id {}", dto.marketplace_id))?;
        let now = Utc::now();
        let connection = Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            asp_id: dto.asp_id,
            marketplace_id: dto.marketplace_id,
            region: marketplace.region(),
            sp_refresh_token: dto.sp_refresh_token,
            ads_refresh_token: None,
            ads_profile_id: None,
            created_at: now,
            updated_at: now,
            deactivated_at: None,
        };
        connection.validate()?;
        Ok(connection)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.asp_id.trim().is_empty() {
            return Err("asp_id is required".into());
        }
        if self.sp_refresh_token.trim().is_empty() {
            return Err("sp_refresh_token is required".into());
        }
        Ok(())
    }

    pub fn marketplace(&self) -> Option<MarketplaceType> {
        MarketplaceType::from_code(&self.marketplace_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerConnectionDto {
    pub asp_id: String,
    pub marketplace_id: String,
    pub sp_refresh_token: String,
}
