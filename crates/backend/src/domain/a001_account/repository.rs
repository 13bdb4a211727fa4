use anyhow::Result;
use contracts::domain::a001_account::aggregate::Account;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub deactivated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Account {
    fn from(m: Model) -> Self {
        Account {
            id: m.id,
            owner_user_id: m.owner_user_id,
            name: m.name,
            created_at: m.created_at,
            updated_at: m.updated_at,
            deactivated_at: m.deactivated_at,
        }
    }
}

pub async fn insert(db: &DatabaseConnection, account: &Account) -> Result<()> {
    let active = ActiveModel {
        id: Set(account.id.clone()),
        owner_user_id: Set(account.owner_user_id.clone()),
        name: Set(account.name.clone()),
        created_at: Set(account.created_at),
        updated_at: Set(account.updated_at),
        deactivated_at: Set(account.deactivated_at),
    };
    active.insert(db).await?;
    Ok(())
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<Account>> {
    let model = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(model.map(Into::into))
}

/// Accounts owned by a user, oldest first
pub async fn list_by_owner(db: &DatabaseConnection, owner_user_id: &str) -> Result<Vec<Account>> {
    let models = Entity::find()
        .filter(Column::OwnerUserId.eq(owner_user_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Into::into).collect())
}

pub async fn set_deactivated(
    db: &DatabaseConnection,
    id: &str,
    deactivated_at: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<()> {
    let active = ActiveModel {
        id: Set(id.to_string()),
        deactivated_at: Set(deactivated_at),
        updated_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    active.update(db).await?;
    Ok(())
}
