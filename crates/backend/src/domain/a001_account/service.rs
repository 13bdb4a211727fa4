use contracts::domain::a001_account::aggregate::{Account, AccountDto};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::ApiError;

pub async fn create(
    db: &DatabaseConnection,
    owner_user_id: &str,
    dto: AccountDto,
) -> Result<Account, ApiError> {
    let account = Account::new_for_insert(owner_user_id.to_string(), dto.name.trim().to_string());
    account.validate().map_err(|e| ApiError::field("name", e))?;
    repository::insert(db, &account).await?;
    tracing::info!("Created account {} for user {}", account.id, owner_user_id);
    Ok(account)
}

pub async fn list_for_owner(
    db: &DatabaseConnection,
    owner_user_id: &str,
) -> Result<Vec<Account>, ApiError> {
    Ok(repository::list_by_owner(db, owner_user_id).await?)
}

/// The account a request acts on: the one named in `x-account` if the user
/// owns it, otherwise the user's first active account
pub async fn resolve_for_user(
    db: &DatabaseConnection,
    owner_user_id: &str,
    requested: Option<&str>,
) -> Result<Account, ApiError> {
    let account = match requested.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => repository::get_by_id(db, id)
            .await?
            .filter(|a| a.owner_user_id == owner_user_id)
            .ok_or(ApiError::AccountRejected("account_not_found"))?,
        None => {
            let owned = repository::list_by_owner(db, owner_user_id).await?;
            match owned.iter().find(|a| a.is_active()) {
                Some(active) => active.clone(),
                None => owned
                    .into_iter()
                    .next()
                    .ok_or(ApiError::AccountRejected("account_not_found"))?,
            }
        }
    };

    if !account.is_active() {
        return Err(ApiError::AccountRejected("account_deactivated"));
    }
    Ok(account)
}
