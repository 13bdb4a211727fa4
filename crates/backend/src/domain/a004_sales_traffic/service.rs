use contracts::domain::a004_sales_traffic::aggregate::{SalesTrafficAsin, SalesTrafficSummary};
use sea_orm::DatabaseConnection;

use super::repository;

pub async fn store_summary(
    db: &DatabaseConnection,
    row: &SalesTrafficSummary,
) -> anyhow::Result<bool> {
    repository::upsert_summary(db, row).await
}

/// Returns `None` when the row is invalid and was skipped
pub async fn store_asin(
    db: &DatabaseConnection,
    row: &SalesTrafficAsin,
) -> anyhow::Result<Option<bool>> {
    if let Err(e) = row.validate() {
        tracing::warn!("Skipping sales & traffic row: {}", e);
        return Ok(None);
    }
    Ok(Some(repository::upsert_asin(db, row).await?))
}
