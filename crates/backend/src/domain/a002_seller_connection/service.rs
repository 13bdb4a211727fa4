use contracts::domain::a002_seller_connection::aggregate::{
    SellerConnection, SellerConnectionDto,
};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::ApiError;

pub async fn connect(
    db: &DatabaseConnection,
    account_id: &str,
    dto: SellerConnectionDto,
) -> Result<SellerConnection, ApiError> {
    let connection = SellerConnection::new_for_insert(account_id.to_string(), dto)
        .map_err(|e| ApiError::field("seller_connection", e))?;
    let stored = repository::upsert(db, &connection).await?;
    tracing::info!(
        "Seller {} connected to account {} in {}",
        stored.asp_id,
        account_id,
        stored.marketplace_id
    );
    Ok(stored)
}

pub async fn list(
    db: &DatabaseConnection,
    account_id: &str,
) -> Result<Vec<SellerConnection>, ApiError> {
    Ok(repository::list_active(db, account_id, None).await?)
}

/// The active connection for a seller; without a marketplace the oldest one
pub async fn require(
    db: &DatabaseConnection,
    account_id: &str,
    asp_id: &str,
    marketplace_id: Option<&str>,
) -> Result<SellerConnection, ApiError> {
    let connections = repository::list_active(db, account_id, Some(asp_id)).await?;
    let found = match marketplace_id.filter(|m| !m.trim().is_empty()) {
        Some(marketplace_id) => connections
            .into_iter()
            .find(|c| c.marketplace_id == marketplace_id),
        None => connections.into_iter().next(),
    };
    found.ok_or_else(|| ApiError::field("asp_id", "no active seller connection for this account"))
}
