use contracts::domain::a010_fba_return::aggregate::FbaReturn;
use sea_orm::DatabaseConnection;

use super::repository;

/// Returns `None` when the row is invalid and was skipped
pub async fn store(db: &DatabaseConnection, row: &FbaReturn) -> anyhow::Result<Option<bool>> {
    if let Err(e) = row.validate() {
        tracing::warn!("Skipping FBA return: {}", e);
        return Ok(None);
    }
    Ok(Some(repository::upsert(db, row).await?))
}
