use contracts::domain::a005_settlement::aggregate::SettlementLine;
use sea_orm::DatabaseConnection;

use super::repository;

/// Returns `None` when the line is invalid and was skipped
pub async fn store(db: &DatabaseConnection, line: &SettlementLine) -> anyhow::Result<Option<bool>> {
    if let Err(e) = line.validate() {
        tracing::warn!("Skipping settlement line for order {}: {}", line.order_id, e);
        return Ok(None);
    }
    Ok(Some(repository::upsert(db, line).await?))
}
